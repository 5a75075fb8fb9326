//! Screen-space labels

use crate::foundation::math::Vec2;

const FPS_SMOOTHING: f32 = 0.1;

/// Where a label is pinned on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiAnchor {
    /// Top-left corner (0, 0) in screen space
    TopLeft,
    /// Top-right corner
    TopRight,
    /// Center of screen
    Center,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom-right corner
    BottomRight,
}

impl GuiAnchor {
    /// Get the normalized anchor position (0.0 to 1.0)
    pub fn to_normalized(self) -> (f32, f32) {
        match self {
            GuiAnchor::TopLeft => (0.0, 0.0),
            GuiAnchor::TopRight => (1.0, 0.0),
            GuiAnchor::Center => (0.5, 0.5),
            GuiAnchor::BottomLeft => (0.0, 1.0),
            GuiAnchor::BottomRight => (1.0, 1.0),
        }
    }
}

/// Text label pinned to an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct GuiLabel {
    /// Text to draw
    pub text: String,
    /// Screen anchor
    pub anchor: GuiAnchor,
    /// Pixel offset from the anchor
    pub offset: Vec2,
    /// Resolved pixel position, updated on layout
    pub screen_position: Vec2,
}

/// GUI collaborator
#[derive(Debug, Default)]
pub struct GuiSystem {
    width: u32,
    height: u32,
    labels: Vec<GuiLabel>,
    fps_label: Option<usize>,
    smoothed_fps: f32,
}

impl GuiSystem {
    /// Create an empty GUI
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the GUI to the surface and add the frame-rate label
    pub fn init(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if self.fps_label.is_none() {
            self.fps_label = Some(self.add_label("FPS: --", GuiAnchor::TopLeft, Vec2::new(10.0, 10.0)));
        }
        self.layout();
    }

    /// Add a label and return its index
    pub fn add_label(&mut self, text: impl Into<String>, anchor: GuiAnchor, offset: Vec2) -> usize {
        self.labels.push(GuiLabel {
            text: text.into(),
            anchor,
            offset,
            screen_position: Vec2::zeros(),
        });
        self.layout();
        self.labels.len() - 1
    }

    /// Relayout against a new surface size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.layout();
    }

    /// Refresh the frame-rate label
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            let fps = 1.0 / dt;
            self.smoothed_fps = if self.smoothed_fps == 0.0 {
                fps
            } else {
                self.smoothed_fps + (fps - self.smoothed_fps) * FPS_SMOOTHING
            };
        }
        if let Some(label) = self.fps_label.and_then(|index| self.labels.get_mut(index)) {
            label.text = format!("FPS: {:.0}", self.smoothed_fps);
        }
    }

    /// All labels
    pub fn labels(&self) -> &[GuiLabel] {
        &self.labels
    }

    /// Smoothed frame rate
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    #[allow(clippy::cast_precision_loss)]
    fn layout(&mut self) {
        let size = Vec2::new(self.width as f32, self.height as f32);
        for label in &mut self.labels {
            let (nx, ny) = label.anchor.to_normalized();
            // Offsets point inward from the anchored edge
            let sign = Vec2::new(1.0 - 2.0 * nx.round(), 1.0 - 2.0 * ny.round());
            label.screen_position = Vec2::new(nx * size.x, ny * size.y) + label.offset.component_mul(&sign);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fps_label_tracks_frame_time() {
        let mut gui = GuiSystem::new();
        gui.init(1280, 720);
        gui.update(0.02);

        assert_relative_eq!(gui.fps(), 50.0);
        assert_eq!(gui.labels()[0].text, "FPS: 50");
        assert_relative_eq!(gui.labels()[0].screen_position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_labels_follow_resize() {
        let mut gui = GuiSystem::new();
        gui.init(800, 600);
        let corner = gui.add_label("v0.1", GuiAnchor::BottomRight, Vec2::new(5.0, 5.0));
        assert_relative_eq!(gui.labels()[corner].screen_position, Vec2::new(795.0, 595.0));

        gui.resize(1920, 1080);
        assert_relative_eq!(gui.labels()[corner].screen_position, Vec2::new(1915.0, 1075.0));
    }
}
