//! Image loading utilities for texture data

use std::path::Path;

use crate::assets::AssetError;

/// Loaded image data ready for upload
///
/// Owns its pixel buffer. Elevation maps are handed to terrain generation by
/// value and dropped there, so the buffer never outlives the terrain build.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|e| AssetError::Image {
            path: path_ref.display().to_string(),
            message: e.to_string(),
        })?;

        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();
        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Create a solid color image (useful for testing and defaults)
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let data = color.iter().copied().cycle().take(pixel_count * 4).collect();

        Self { data, width, height }
    }

    /// Greyscale image from one byte per pixel
    pub fn from_luminance(width: u32, height: u32, values: &[u8]) -> Self {
        let data = values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        Self { data, width, height }
    }

    /// Get the size of the image data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Luminance of the pixel nearest to `(u, v)` in `[0, 1]`, as `[0, 1]`
    pub fn sample_luminance(&self, u: f32, v: f32) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 0.0;
        }
        let x = nearest_index(u, self.width);
        let y = nearest_index(v, self.height);
        let offset = (y * self.width as usize + x) * 4;
        match self.data.get(offset..offset + 3) {
            Some(rgb) => {
                let sum: f32 = rgb.iter().map(|&c| f32::from(c)).sum();
                sum / (3.0 * 255.0)
            }
            None => 0.0,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nearest_index(t: f32, size: u32) -> usize {
    let max = (size - 1) as f32;
    (t.clamp(0.0, 1.0) * max).round() as usize
}

/// Six cube faces in +X, -X, +Y, -Y, +Z, -Z order
#[derive(Debug, Clone)]
pub struct CubemapData {
    /// Face images
    pub faces: [ImageData; 6],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_image() {
        let img = ImageData::solid_color(4, 4, [255, 0, 0, 255]);
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 4);
        assert_eq!(img.size_bytes(), 4 * 4 * 4);
        assert_eq!(&img.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_luminance_sampling_hits_corners() {
        let img = ImageData::from_luminance(2, 2, &[0, 255, 255, 0]);

        assert_eq!(img.sample_luminance(0.0, 0.0), 0.0);
        assert_eq!(img.sample_luminance(1.0, 0.0), 1.0);
        assert_eq!(img.sample_luminance(0.0, 1.0), 1.0);
        assert_eq!(img.sample_luminance(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ImageData::from_file("does/not/exist.tga").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.tga"));
    }
}
