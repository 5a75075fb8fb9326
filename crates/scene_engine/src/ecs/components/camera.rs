//! Camera component
//!
//! Position/forward pair plus perspective parameters. Matrices are recomputed
//! on every change so readers never see a stale projection.

use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Perspective camera attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    /// Eye position in world space
    pub position: Vec3,
    /// Look direction (normalized on update)
    pub forward: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Component for CameraComponent {}

impl Default for CameraComponent {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(60.0),
            aspect: 1.0,
            near: 0.01,
            far: 100.0,
            view: Mat4::identity(),
            projection: Mat4::identity(),
        };
        camera.update_view();
        camera.update_projection();
        camera
    }
}

impl CameraComponent {
    /// Set every projection parameter at once
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.update_projection();
    }

    /// Move the eye and look direction together
    pub fn set_pose(&mut self, position: Vec3, forward: Vec3) {
        self.position = position;
        self.forward = forward;
        self.update_view();
    }

    /// Recompute the view matrix from position/forward/up
    pub fn update_view(&mut self) {
        if self.forward.norm_squared() > f32::EPSILON {
            self.forward = self.forward.normalize();
        }
        self.view = Mat4::look_at(self.position, self.position + self.forward, self.up);
    }

    /// Recompute the projection matrix from fov/aspect/near/far
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective(self.fov, self.aspect, self.near, self.far);
    }

    /// Camera right vector
    pub fn right(&self) -> Vec3 {
        self.forward.cross(&self.up).normalize()
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// Combined projection × view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_perspective_updates_projection() {
        let mut camera = CameraComponent::default();
        camera.set_perspective(utils::deg_to_rad(60.0), 16.0 / 9.0, 0.1, 1000.0);

        assert_relative_eq!(camera.aspect, 16.0 / 9.0);
        let expected = Mat4::perspective(camera.fov, 16.0 / 9.0, 0.1, 1000.0);
        assert_relative_eq!(*camera.projection_matrix(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_set_pose_normalizes_forward() {
        let mut camera = CameraComponent::default();
        camera.set_pose(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -4.0));

        assert_relative_eq!(camera.forward, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.right(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }
}
