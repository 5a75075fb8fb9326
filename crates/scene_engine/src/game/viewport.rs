//! Viewport resizing

use crate::ecs::{CameraComponent, World};
use crate::foundation::math::utils;
use crate::game::composition::{aspect_ratio, CAMERA_FOV_DEGREES};

/// Near clip plane every camera gets on resize
pub const RESIZE_NEAR_PLANE: f32 = 0.01;

/// Far clip plane every camera gets on resize
pub const RESIZE_FAR_PLANE: f32 = 10000.0;

/// Recompute every camera's projection for a `width` × `height` surface
///
/// Field of view, aspect and both clip planes are reset to the fixed values.
/// Returns the number of cameras updated, or `None` when the height is zero.
pub fn resize_cameras(world: &mut World, width: u32, height: u32) -> Option<usize> {
    if height == 0 {
        log::debug!("Ignoring resize to {}x{}", width, height);
        return None;
    }

    let fov = utils::deg_to_rad(CAMERA_FOV_DEGREES);
    let aspect = aspect_ratio(width, height);
    let mut count = 0;
    for camera in world.components_mut::<CameraComponent>() {
        camera.set_perspective(fov, aspect, RESIZE_NEAR_PLANE, RESIZE_FAR_PLANE);
        count += 1;
    }
    Some(count)
}
