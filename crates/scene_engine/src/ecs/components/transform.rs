//! Transform component for the ECS system
//!
//! Local translation, rotation and scale plus an optional parent. The parent
//! is the identity of another *transform component*, not of an entity, so the
//! hierarchy is a forest of transforms.

use crate::ecs::{Component, ComponentId};
use crate::foundation::math::{Mat4, Quat, Vec3};

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// Position relative to the parent (world space when unparented)
    pub position: Vec3,

    /// Rotation relative to the parent
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,

    /// Parent transform, assigned through [`World::set_parent`](crate::ecs::World::set_parent)
    pub parent: Option<ComponentId<TransformComponent>>,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Local matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Builder pattern: Set rotation from Euler angles (radians, XYZ order)
    pub fn with_rotation_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler_angles(x, y, z);
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }
}
