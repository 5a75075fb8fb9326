//! Debug overlay system
//!
//! Draws after the renderer so its shapes land on top of the frame. The
//! graphics system and particle emitter are borrowed on every call instead of
//! being retained, so the overlay never outlives what it inspects.

use bitflags::bitflags;

use crate::ecs::{ColliderComponent, ColliderKind, Entity, LightComponent, LightType, World};
use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::GraphicsSystem;
use crate::systems::ParticleEmitter;

const LIGHT_GIZMO_LENGTH: f32 = 2.0;

bitflags! {
    /// Which overlays are drawn
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DebugFlags: u8 {
        /// Ray and box colliders
        const COLLIDERS = 1 << 0;
        /// Light directions
        const LIGHTS = 1 << 1;
        /// Particle cloud bounds
        const PARTICLES = 1 << 2;
        /// Mesh bounding boxes
        const MESH_BOUNDS = 1 << 3;
    }
}

impl Default for DebugFlags {
    fn default() -> Self {
        Self::COLLIDERS | Self::LIGHTS | Self::PARTICLES
    }
}

/// Debug collaborator
#[derive(Debug, Default)]
pub struct DebugSystem {
    draw: super::DebugDrawSystem,
    /// Enabled overlays
    pub flags: DebugFlags,
    active: bool,
    viewport: (u32, u32),
    collider_entities: Vec<Entity>,
    light_entities: Vec<Entity>,
}

impl DebugSystem {
    /// Create an inactive debug system
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture what the overlay draws over
    pub fn init(&mut self, graphics: &GraphicsSystem, particles: &ParticleEmitter) {
        self.viewport = graphics.viewport();
        log::debug!(
            "Debug overlay bound to {}x{} viewport, {} live particle(s)",
            self.viewport.0,
            self.viewport.1,
            particles.len()
        );
    }

    /// Record the entities carrying colliders and lights
    pub fn late_init(&mut self, world: &World) {
        self.collider_entities = world.query::<ColliderComponent>().map(|(entity, _)| entity).collect();
        self.light_entities = world.query::<LightComponent>().map(|(entity, _)| entity).collect();
        log::debug!(
            "Debug overlay tracks {} collider(s), {} light(s)",
            self.collider_entities.len(),
            self.light_entities.len()
        );
    }

    /// Turn the overlay on or off
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.draw.clear();
        }
    }

    /// Whether the overlay is drawing
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Debug shapes for this frame
    pub fn draw_system(&self) -> &super::DebugDrawSystem {
        &self.draw
    }

    /// Rebuild the overlay for this frame
    pub fn update(&mut self, world: &World, graphics: &GraphicsSystem, particles: &ParticleEmitter, dt: f32) {
        if !self.active {
            return;
        }
        self.draw.update(dt);
        self.viewport = graphics.viewport();

        if self.flags.contains(DebugFlags::COLLIDERS) {
            self.draw_colliders(world);
        }
        if self.flags.contains(DebugFlags::LIGHTS) {
            self.draw_lights(world);
        }
        if self.flags.contains(DebugFlags::PARTICLES) {
            match particles.bounds() {
                Some((min, max)) => self.draw.draw_persistent(
                    "particles",
                    super::DebugShape::Box {
                        center: (min + max) * 0.5,
                        extents: (max - min) * 0.5,
                        color: Vec4::new(0.2, 0.6, 1.0, 1.0),
                        duration: f32::INFINITY,
                    },
                ),
                None => self.draw.clear_persistent("particles"),
            }
        }
        if self.flags.contains(DebugFlags::MESH_BOUNDS) {
            for draw in graphics.draw_list() {
                if let Some(geometry) = graphics.geometry(draw.geometry) {
                    let min = transform_point(&draw.model, &geometry.aabb_min);
                    let max = transform_point(&draw.model, &geometry.aabb_max);
                    self.draw.draw_persistent(
                        format!("mesh:{}", draw.entity),
                        super::DebugShape::Box {
                            center: (min + max) * 0.5,
                            extents: (max - min).abs() * 0.5,
                            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
                            duration: f32::INFINITY,
                        },
                    );
                }
            }
        }
    }

    fn draw_colliders(&mut self, world: &World) {
        for &entity in &self.collider_entities {
            let (Some(collider), Some(matrix)) =
                (world.get_component::<ColliderComponent>(entity), world.entity_world_matrix(entity))
            else {
                continue;
            };
            let origin = transform_point(&matrix, &Vec3::zeros());
            let shape = match collider.kind {
                ColliderKind::Ray => {
                    let direction = matrix.transform_vector(&collider.direction);
                    let length = if collider.colliding {
                        collider.collision_distance
                    } else {
                        collider.max_distance
                    };
                    let color = if collider.colliding {
                        Vec4::new(1.0, 0.0, 0.0, 1.0)
                    } else {
                        Vec4::new(0.0, 1.0, 0.0, 1.0)
                    };
                    super::DebugShape::Line {
                        start: origin,
                        end: origin + direction.normalize() * length,
                        color,
                        duration: f32::INFINITY,
                    }
                }
                ColliderKind::Box => super::DebugShape::Box {
                    center: transform_point(&matrix, &collider.local_center),
                    extents: collider.half_extents,
                    color: Vec4::new(1.0, 0.5, 0.0, 1.0),
                    duration: f32::INFINITY,
                },
            };
            self.draw.draw_persistent(format!("collider:{}", entity), shape);
        }
    }

    fn draw_lights(&mut self, world: &World) {
        for &entity in &self.light_entities {
            let (Some(light), Some(matrix)) =
                (world.get_component::<LightComponent>(entity), world.entity_world_matrix(entity))
            else {
                continue;
            };
            let origin = transform_point(&matrix, &Vec3::zeros());
            let color = Vec4::new(light.color.x, light.color.y, light.color.z, 1.0);
            let shape = match light.light_type {
                LightType::Directional => super::DebugShape::Line {
                    start: origin,
                    end: origin + light.direction * LIGHT_GIZMO_LENGTH,
                    color,
                    duration: f32::INFINITY,
                },
                LightType::Point => super::DebugShape::Point {
                    position: origin,
                    color,
                    size: 8.0,
                    duration: f32::INFINITY,
                },
            };
            self.draw.draw_persistent(format!("light:{}", entity), shape);
        }
    }
}

fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&nalgebra::Point3::from(*point)).coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleConfig;
    use crate::debug::DebugShape;
    use crate::ecs::TransformComponent;

    fn scene() -> (World, Entity) {
        let mut world = World::new();
        let sensor = world.create_entity("Down Ray");
        world
            .add_component(sensor, TransformComponent::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        world
            .add_component(sensor, ColliderComponent::ray(Vec3::new(0.0, -1.0, 0.0), 100.0))
            .unwrap();
        let light = world.create_entity("Directional Light");
        world.add_component(light, LightComponent::default()).unwrap();
        (world, sensor)
    }

    #[test]
    fn test_inactive_overlay_draws_nothing() {
        let (world, _) = scene();
        let graphics = GraphicsSystem::new();
        let particles = ParticleEmitter::with_seed(ParticleConfig::default(), 1);
        let mut debug = DebugSystem::new();
        debug.init(&graphics, &particles);
        debug.late_init(&world);

        debug.update(&world, &graphics, &particles, 0.016);
        assert_eq!(debug.draw_system().shape_count(), 0);
    }

    #[test]
    fn test_active_overlay_draws_rays_and_lights() {
        let (world, _) = scene();
        let graphics = GraphicsSystem::new();
        let particles = ParticleEmitter::with_seed(ParticleConfig::default(), 1);
        let mut debug = DebugSystem::new();
        debug.init(&graphics, &particles);
        debug.late_init(&world);
        debug.set_active(true);

        debug.update(&world, &graphics, &particles, 0.016);

        let shapes = debug.draw_system().shapes();
        assert_eq!(shapes.len(), 2);
        let ray_end = shapes.iter().find_map(|shape| match shape {
            DebugShape::Line { end, color, .. } if color.y == 1.0 && color.x == 0.0 => Some(*end),
            _ => None,
        });
        assert_eq!(ray_end, Some(Vec3::new(0.0, -97.0, 0.0)));

        debug.set_active(false);
        assert_eq!(debug.draw_system().shape_count(), 0);
    }
}
