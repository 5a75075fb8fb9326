//! Collider component
//!
//! Rays are directional probes of bounded length (ground and wall sensors);
//! boxes are the solid volumes rays are tested against. The collision system
//! writes each frame's ray result back into the ray's component.

use crate::ecs::{Component, Entity};
use crate::foundation::math::Vec3;

/// Shape of a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    /// Directional probe starting at the transform origin
    Ray,
    /// Axis-aligned box around the transform origin
    Box,
}

/// Collider component
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Shape of this collider
    pub kind: ColliderKind,
    /// Ray direction in the owner's local space
    pub direction: Vec3,
    /// Longest distance a ray reports a hit at
    pub max_distance: f32,
    /// Box center offset from the transform origin
    pub local_center: Vec3,
    /// Box half extents
    pub half_extents: Vec3,
    /// Ray hit something this frame
    pub colliding: bool,
    /// Distance along the ray to the nearest hit
    pub collision_distance: f32,
    /// World space hit point
    pub collision_point: Vec3,
    /// Entity owning the box that was hit
    pub collided_with: Option<Entity>,
}

impl Component for ColliderComponent {}

impl ColliderComponent {
    /// Ray probe pointing along `direction`
    pub fn ray(direction: Vec3, max_distance: f32) -> Self {
        Self {
            kind: ColliderKind::Ray,
            direction,
            max_distance,
            local_center: Vec3::zeros(),
            half_extents: Vec3::zeros(),
            colliding: false,
            collision_distance: f32::INFINITY,
            collision_point: Vec3::zeros(),
            collided_with: None,
        }
    }

    /// Solid box with the given half extents
    pub fn aabb(local_center: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: ColliderKind::Box,
            direction: Vec3::zeros(),
            max_distance: 0.0,
            local_center,
            half_extents,
            ..Self::ray(Vec3::zeros(), 0.0)
        }
    }

    /// Record a hit for this frame
    pub fn record_hit(&mut self, distance: f32, point: Vec3, other: Entity) {
        self.colliding = true;
        self.collision_distance = distance;
        self.collision_point = point;
        self.collided_with = Some(other);
    }

    /// Forget last frame's result
    pub(crate) fn clear_frame_data(&mut self) {
        self.colliding = false;
        self.collision_distance = f32::INFINITY;
        self.collided_with = None;
    }
}
