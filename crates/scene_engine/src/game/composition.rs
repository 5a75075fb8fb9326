//! Entity composition recipes
//!
//! Both recipes build a camera-bearing entity, make its camera the world's
//! main camera and switch the control mode. Superseding a previous main
//! camera is implicit.

use crate::ecs::{CameraComponent, ColliderComponent, EcsError, Entity, TransformComponent, World};
use crate::foundation::math::{utils, Vec3};
use crate::systems::{ControlMode, ControlSystem, FpsColliderSlots};

/// Vertical field of view of every camera the recipes build, in degrees
pub const CAMERA_FOV_DEGREES: f32 = 60.0;

const FREE_CAMERA_NEAR: f32 = 0.1;
const FREE_CAMERA_FAR: f32 = 1000.0;

const PLAYER_START: [f32; 3] = [0.0, 3.0, 5.0];
const PLAYER_NEAR: f32 = 0.01;
const PLAYER_FAR: f32 = 10000.0;

/// Sensor rays of the FPS rig: label, local direction, max distance
const SENSOR_RAYS: [(&str, [f32; 3], f32); 5] = [
    ("Down Ray", [0.0, -1.0, 0.0], 100.0),
    ("Left Ray", [-1.0, 0.0, 0.0], 1.0),
    ("Right Ray", [1.0, 0.0, 0.0], 1.0),
    ("Forward Ray", [0.0, 0.0, -1.0], 1.0),
    ("Back Ray", [0.0, 0.0, 1.0], 1.0),
];

/// Free-flying camera at `position` looking along `forward`
pub fn create_free_camera(
    world: &mut World,
    control: &mut ControlSystem,
    position: Vec3,
    forward: Vec3,
    aspect: f32,
) -> Result<Entity, EcsError> {
    let entity = world.create_entity("PlayerFree");
    world
        .get_component_mut::<TransformComponent>(entity)
        .ok_or(EcsError::MissingComponent { entity, component: "TransformComponent" })?
        .translate(position);

    let mut camera = CameraComponent::default();
    camera.set_pose(position, forward);
    camera.set_perspective(utils::deg_to_rad(CAMERA_FOV_DEGREES), aspect, FREE_CAMERA_NEAR, FREE_CAMERA_FAR);
    let camera_id = world.add_component(entity, camera)?;

    world.set_main_camera(camera_id);
    control.set_mode(ControlMode::Free);
    log::info!("Free camera {} at {:?}", entity, position);
    Ok(entity)
}

/// FPS player with five parented sensor rays registered in `control`
pub fn create_player(world: &mut World, control: &mut ControlSystem, aspect: f32) -> Result<Entity, EcsError> {
    let position = Vec3::from(PLAYER_START);
    let player = world.create_entity("PlayerFPS");
    world
        .get_component_mut::<TransformComponent>(player)
        .ok_or(EcsError::MissingComponent { entity: player, component: "TransformComponent" })?
        .translate(position);
    let player_transform = world.require_component_id::<TransformComponent>(player)?;

    let mut camera = CameraComponent::default();
    camera.set_pose(position, Vec3::new(0.0, 0.0, -1.0));
    camera.set_perspective(utils::deg_to_rad(CAMERA_FOV_DEGREES), aspect, PLAYER_NEAR, PLAYER_FAR);
    let camera_id = world.add_component(player, camera)?;
    world.set_main_camera(camera_id);

    let mut sensors = [None; SENSOR_RAYS.len()];
    for (slot, (label, direction, max_distance)) in sensors.iter_mut().zip(SENSOR_RAYS) {
        let sensor = world.create_entity(label);
        world.set_parent(sensor, player_transform)?;
        *slot = Some(world.add_component(sensor, ColliderComponent::ray(Vec3::from(direction), max_distance))?);
    }

    let [down, left, right, forward, back] = sensors;
    control.fps_colliders = FpsColliderSlots { down, left, right, forward, back };
    control.set_mode(ControlMode::Fps);

    log::info!("FPS player {} with {} sensor rays", player, SENSOR_RAYS.len());
    Ok(player)
}

/// Width over height, 1 for a degenerate surface
#[allow(clippy::cast_precision_loss)]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
