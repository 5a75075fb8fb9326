//! Debug drawing primitives

use std::collections::HashMap;

use crate::foundation::math::{Vec3, Vec4};

/// Debug shape primitives that can be rendered for visualization
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Line segment from start to end
    Line {
        /// Start point
        start: Vec3,
        /// End point
        end: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Axis-aligned wireframe box
    Box {
        /// Box center
        center: Vec3,
        /// Half extents
        extents: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Seconds left
        duration: f32,
    },

    /// Point at position
    Point {
        /// Position
        position: Vec3,
        /// RGBA colour
        color: Vec4,
        /// Size in pixels
        size: f32,
        /// Seconds left
        duration: f32,
    },
}

impl DebugShape {
    fn duration_mut(&mut self) -> &mut f32 {
        match self {
            DebugShape::Line { duration, .. }
            | DebugShape::Box { duration, .. }
            | DebugShape::Point { duration, .. } => duration,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        let duration = self.duration_mut();
        *duration -= delta_time;
        *duration <= 0.0
    }
}

/// Debug drawing system
///
/// Temporary shapes expire after their duration; persistent shapes stay until
/// replaced or cleared by id.
#[derive(Debug)]
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    persistent_shapes: HashMap<String, DebugShape>,
    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            persistent_shapes: HashMap::new(),
            enabled: true,
        }
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.push(DebugShape::Line { start, end, color, duration });
    }

    /// Draw a box (temporary)
    pub fn draw_box(&mut self, center: Vec3, extents: Vec3, color: Vec4, duration: f32) {
        self.push(DebugShape::Box { center, extents, color, duration });
    }

    /// Draw a point (temporary)
    pub fn draw_point(&mut self, position: Vec3, color: Vec4, size: f32, duration: f32) {
        self.push(DebugShape::Point { position, color, size, duration });
    }

    /// Draw a persistent shape that remains until explicitly removed
    pub fn draw_persistent(&mut self, id: impl Into<String>, shape: DebugShape) {
        if self.enabled {
            self.persistent_shapes.insert(id.into(), shape);
        }
    }

    /// Remove a persistent shape
    pub fn clear_persistent(&mut self, id: &str) {
        self.persistent_shapes.remove(id);
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if self.enabled {
            self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
        }
    }

    /// All shapes for rendering (both temporary and persistent)
    pub fn shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }
        self.temporary_shapes.iter().chain(self.persistent_shapes.values()).collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.persistent_shapes.len()
    }

    /// Clear all shapes (temporary and persistent)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.persistent_shapes.clear();
    }

    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.temporary_shapes.push(shape);
        }
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
