//! Texture registry entries

use crate::assets::{CubemapData, ImageData};

/// Pixel payload of a texture
#[derive(Debug, Clone)]
pub enum TextureData {
    /// Single 2D image
    Flat(ImageData),
    /// Six-face cube
    Cube(CubemapData),
}

/// A registered texture
#[derive(Debug, Clone)]
pub struct Texture {
    /// Source path or generated name
    pub name: String,
    /// Pixels
    pub data: TextureData,
}

impl Texture {
    /// Width and height of one face
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.data {
            TextureData::Flat(image) => (image.width, image.height),
            TextureData::Cube(cube) => (cube.faces[0].width, cube.faces[0].height),
        }
    }

    /// Whether this is a cubemap
    pub fn is_cubemap(&self) -> bool {
        matches!(self.data, TextureData::Cube(_))
    }
}
