//! Player input and camera movement
//!
//! Two mutually exclusive modes. `Free` flies the main camera anywhere.
//! `Fps` walks the camera's entity on the ground using the five sensor rays
//! the player rig registers in [`FpsColliderSlots`].

use bitflags::bitflags;

use crate::ecs::{CameraComponent, ColliderComponent, ComponentId, TransformComponent, World};
use crate::foundation::math::Vec3;

/// Height of the eye above the ground hit by the down ray
pub const FPS_EYE_HEIGHT: f32 = 3.0;

const GRAVITY: f32 = 9.8;
const MAX_PITCH_COS: f32 = 0.99;

bitflags! {
    /// Movement keys currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MoveKeys: u8 {
        /// W
        const FORWARD = 1 << 0;
        /// S
        const BACK = 1 << 1;
        /// A
        const LEFT = 1 << 2;
        /// D
        const RIGHT = 1 << 3;
        /// E
        const UP = 1 << 4;
        /// Q
        const DOWN = 1 << 5;
    }
}

/// Input handling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// Free-flying camera
    #[default]
    Free,
    /// Ground-bound first person player
    Fps,
}

/// Sensor rays of the FPS player rig
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FpsColliderSlots {
    /// Ground probe
    pub down: Option<ComponentId<ColliderComponent>>,
    /// Left wall probe
    pub left: Option<ComponentId<ColliderComponent>>,
    /// Right wall probe
    pub right: Option<ComponentId<ColliderComponent>>,
    /// Forward wall probe
    pub forward: Option<ComponentId<ColliderComponent>>,
    /// Backward wall probe
    pub back: Option<ComponentId<ColliderComponent>>,
}

impl FpsColliderSlots {
    /// Whether every slot is filled
    pub fn is_complete(&self) -> bool {
        self.lateral().iter().all(Option::is_some) && self.down.is_some()
    }

    fn lateral(&self) -> [Option<ComponentId<ColliderComponent>>; 4] {
        [self.left, self.right, self.forward, self.back]
    }
}

/// Control collaborator
#[derive(Debug)]
pub struct ControlSystem {
    mode: ControlMode,
    /// FPS sensor rays
    pub fps_colliders: FpsColliderSlots,
    keys: MoveKeys,
    mouse_delta: (f32, f32),
    /// Units per second
    pub move_speed: f32,
    /// Radians per mouse unit
    pub turn_speed: f32,
    fall_speed: f32,
}

impl Default for ControlSystem {
    fn default() -> Self {
        Self {
            mode: ControlMode::default(),
            fps_colliders: FpsColliderSlots::default(),
            keys: MoveKeys::empty(),
            mouse_delta: (0.0, 0.0),
            move_speed: 10.0,
            turn_speed: 0.002,
            fall_speed: 0.0,
        }
    }
}

impl ControlSystem {
    /// Create a control system in free mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear input state
    pub fn init(&mut self) {
        self.keys = MoveKeys::empty();
        self.mouse_delta = (0.0, 0.0);
        self.fall_speed = 0.0;
    }

    /// Current mode
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Switch mode; the last caller wins
    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.mode != mode {
            log::debug!("Control mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        self.fall_speed = 0.0;
    }

    /// Keys pressed
    pub fn press(&mut self, keys: MoveKeys) {
        self.keys.insert(keys);
    }

    /// Keys released
    pub fn release(&mut self, keys: MoveKeys) {
        self.keys.remove(keys);
    }

    /// Currently held keys
    pub fn keys(&self) -> MoveKeys {
        self.keys
    }

    /// Accumulate mouse movement until the next update
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Move the main camera according to the current mode
    pub fn update(&mut self, world: &mut World, dt: f32) {
        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        let Some(camera_id) = world.main_camera() else {
            return;
        };
        let Some(camera) = world.get::<CameraComponent>(camera_id) else {
            return;
        };

        let forward = turn(camera.forward, camera.up, dx * self.turn_speed, dy * self.turn_speed);
        let position = match self.mode {
            ControlMode::Free => camera.position + self.free_displacement(camera, forward) * dt,
            ControlMode::Fps => self.fps_position(world, camera, forward, dt),
        };

        if let Some(camera) = world.get_mut(camera_id) {
            camera.set_pose(position, forward);
        }
        sync_transform(world, camera_id, position);
    }

    fn free_displacement(&self, camera: &CameraComponent, forward: Vec3) -> Vec3 {
        let right = forward.cross(&camera.up).normalize();
        let mut direction = Vec3::zeros();
        for (key, axis) in [
            (MoveKeys::FORWARD, forward),
            (MoveKeys::BACK, -forward),
            (MoveKeys::RIGHT, right),
            (MoveKeys::LEFT, -right),
            (MoveKeys::UP, camera.up),
            (MoveKeys::DOWN, -camera.up),
        ] {
            if self.keys.contains(key) {
                direction += axis;
            }
        }
        direction * self.move_speed
    }

    fn fps_position(&mut self, world: &World, camera: &CameraComponent, forward: Vec3, dt: f32) -> Vec3 {
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z);
        let flat_forward = if flat_forward.norm_squared() > f32::EPSILON {
            flat_forward.normalize()
        } else {
            Vec3::new(0.0, 0.0, -1.0)
        };
        let flat_right = flat_forward.cross(&Vec3::y());

        let mut step = Vec3::zeros();
        for (key, axis) in [
            (MoveKeys::FORWARD, flat_forward),
            (MoveKeys::BACK, -flat_forward),
            (MoveKeys::RIGHT, flat_right),
            (MoveKeys::LEFT, -flat_right),
        ] {
            if self.keys.contains(key) {
                step += axis;
            }
        }
        step *= self.move_speed * dt;

        // A blocked sensor removes the part of the step heading into the wall
        for slot in self.fps_colliders.lateral().into_iter().flatten() {
            if let Some(ray) = world.get(slot).filter(|ray| ray.colliding) {
                let into_wall = step.dot(&ray.direction);
                if into_wall > 0.0 {
                    step -= ray.direction * into_wall;
                }
            }
        }

        let mut position = camera.position + step;
        let ground = self.fps_colliders.down.and_then(|slot| world.get(slot)).filter(|ray| ray.colliding);
        match ground {
            Some(ray) => {
                position.y = ray.collision_point.y + FPS_EYE_HEIGHT;
                self.fall_speed = 0.0;
            }
            None => {
                self.fall_speed += GRAVITY * dt;
                position.y -= self.fall_speed * dt;
            }
        }
        position
    }
}

/// Yaw around `up`, then pitch around the camera's right axis
fn turn(forward: Vec3, up: Vec3, yaw: f32, pitch: f32) -> Vec3 {
    if yaw == 0.0 && pitch == 0.0 {
        return forward;
    }
    let yawed = nalgebra::Rotation3::from_axis_angle(&nalgebra::Unit::new_normalize(up), -yaw) * forward;
    let right = yawed.cross(&up);
    if right.norm_squared() <= f32::EPSILON {
        return yawed;
    }
    let pitched = nalgebra::Rotation3::from_axis_angle(&nalgebra::Unit::new_normalize(right), -pitch) * yawed;
    if pitched.normalize().dot(&up.normalize()).abs() > MAX_PITCH_COS {
        yawed
    } else {
        pitched
    }
}

/// Keep the camera entity's transform on the camera position
fn sync_transform(world: &mut World, camera_id: ComponentId<CameraComponent>, position: Vec3) {
    let Some(entity) = world.owner(camera_id) else {
        return;
    };
    if let Some(transform) = world.get_component_mut::<TransformComponent>(entity) {
        transform.position = position;
    }
}
