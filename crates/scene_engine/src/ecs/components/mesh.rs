//! Mesh component linking an entity to render resources

use crate::ecs::Component;
use crate::render::{GeometryId, MaterialId};

/// Render path a mesh is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// G-buffer pass
    #[default]
    Deferred,
    /// Forward pass, drawn after the deferred meshes
    Forward,
}

/// Mesh component
///
/// `material` is `None` for multi-material geometry, whose material sets
/// carry their own materials.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshComponent {
    /// Geometry to draw
    pub geometry: GeometryId,
    /// Material override for single-material geometry
    pub material: Option<MaterialId>,
    /// Render path
    pub render_mode: RenderMode,
}

impl Component for MeshComponent {}

impl MeshComponent {
    /// Mesh whose geometry supplies its own materials
    pub fn multi_material(geometry: GeometryId) -> Self {
        Self {
            geometry,
            material: None,
            render_mode: RenderMode::default(),
        }
    }

    /// Mesh with a single material
    pub fn new(geometry: GeometryId, material: MaterialId, render_mode: RenderMode) -> Self {
        Self {
            geometry,
            material: Some(material),
            render_mode,
        }
    }
}
