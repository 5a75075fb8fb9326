//! Ray collider resolution
//!
//! Every ray collider is tested against every box collider each frame. Rays
//! and boxes are placed in world space through their transform's parent
//! chain, so sensor rays follow the player they are parented to.

use crate::ecs::{ColliderComponent, ColliderKind, ComponentId, Entity, World};
use crate::foundation::math::{Mat4, Vec3};

/// A ray for ray casting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Box from center and half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point, or 0 when the origin is inside.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
        let inv_dir = Vec3::new(inv(ray.direction.x), inv(ray.direction.y), inv(ray.direction.z));

        let t1 = (self.min - ray.origin).component_mul(&inv_dir);
        let t2 = (self.max - ray.origin).component_mul(&inv_dir);

        let tmin = t1.x.min(t2.x).max(t1.y.min(t2.y)).max(t1.z.min(t2.z));
        let tmax = t1.x.max(t2.x).min(t1.y.max(t2.y)).min(t1.z.max(t2.z));

        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

struct RayProbe {
    id: ComponentId<ColliderComponent>,
    entity: Entity,
    ray: Ray,
    max_distance: f32,
}

/// Collision collaborator
#[derive(Debug, Default)]
pub struct CollisionSystem {
    rays_tested: usize,
    hits: usize,
}

impl CollisionSystem {
    /// Create a collision system
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset counters
    pub fn init(&mut self) {
        self.rays_tested = 0;
        self.hits = 0;
    }

    /// Resolve every ray collider against every box collider
    pub fn update(&mut self, world: &mut World, _dt: f32) {
        let mut boxes = Vec::new();
        let mut probes = Vec::new();

        for (id, entity, collider) in world.query_ids::<ColliderComponent>() {
            let Some(matrix) = world.entity_world_matrix(entity) else {
                continue;
            };
            match collider.kind {
                ColliderKind::Box => boxes.push((entity, world_box(&matrix, collider))),
                ColliderKind::Ray => {
                    if collider.direction.norm_squared() <= f32::EPSILON {
                        continue;
                    }
                    let origin = transform_point(&matrix, &Vec3::zeros());
                    let direction = matrix.transform_vector(&collider.direction);
                    probes.push(RayProbe {
                        id,
                        entity,
                        ray: Ray::new(origin, direction),
                        max_distance: collider.max_distance,
                    });
                }
            }
        }

        self.rays_tested = probes.len();
        self.hits = 0;

        for probe in probes {
            // A sensor never reports the body it hangs from
            let excluded = owners_above(world, probe.entity);
            let nearest = boxes
                .iter()
                .filter(|(owner, _)| !excluded.contains(owner))
                .filter_map(|(owner, aabb)| aabb.intersect_ray(&probe.ray).map(|t| (t, *owner)))
                .filter(|(t, _)| *t <= probe.max_distance)
                .min_by(|a, b| a.0.total_cmp(&b.0));

            let Some(collider) = world.get_mut(probe.id) else {
                continue;
            };
            collider.clear_frame_data();
            if let Some((distance, owner)) = nearest {
                collider.record_hit(distance, probe.ray.point_at(distance), owner);
                self.hits += 1;
            }
        }

        log::trace!("Collision: {} rays, {} hits", self.rays_tested, self.hits);
    }

    /// Rays tested in the last update
    pub fn rays_tested(&self) -> usize {
        self.rays_tested
    }

    /// Rays that hit something in the last update
    pub fn hits(&self) -> usize {
        self.hits
    }
}

fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&nalgebra::Point3::from(*point)).coords
}

/// World-space box; rotation is ignored and scale stretches the extents
fn world_box(matrix: &Mat4, collider: &ColliderComponent) -> Aabb {
    let center = transform_point(matrix, &collider.local_center);
    let scale = Vec3::new(
        matrix.fixed_view::<3, 1>(0, 0).norm(),
        matrix.fixed_view::<3, 1>(0, 1).norm(),
        matrix.fixed_view::<3, 1>(0, 2).norm(),
    );
    Aabb::from_center(center, collider.half_extents.component_mul(&scale))
}

/// The entity itself plus the owners of every transform above it
fn owners_above(world: &World, entity: Entity) -> Vec<Entity> {
    let mut owners = vec![entity];
    if let Some(transform) = world.component_id(entity) {
        owners.extend(world.ancestors(transform).filter_map(|ancestor| world.owner(ancestor)));
    }
    owners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TransformComponent;
    use approx::assert_relative_eq;

    #[test]
    fn test_slab_hit_and_miss() {
        let aabb = Aabb::from_center(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        let hit = aabb.intersect_ray(&Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
        assert_relative_eq!(hit.unwrap(), 4.0);

        let miss = aabb.intersect_ray(&Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0)));
        assert!(miss.is_none());

        let inside = aabb.intersect_ray(&Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(inside, Some(0.0));
    }

    fn world_with_floor() -> (World, Entity) {
        let mut world = World::new();
        let floor = world.create_entity("floor");
        world
            .add_component(floor, ColliderComponent::aabb(Vec3::zeros(), Vec3::new(50.0, 0.5, 50.0)))
            .unwrap();
        (world, floor)
    }

    #[test]
    fn test_parented_ray_hits_floor() {
        let (mut world, floor) = world_with_floor();
        let player = world.create_entity("player");
        world
            .add_component(player, TransformComponent::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let player_transform = world.component_id::<TransformComponent>(player).unwrap();

        let sensor = world.create_entity("Down Ray");
        world.set_parent(sensor, player_transform).unwrap();
        let ray_id = world
            .add_component(sensor, ColliderComponent::ray(Vec3::new(0.0, -1.0, 0.0), 100.0))
            .unwrap();

        let mut collision = CollisionSystem::new();
        collision.update(&mut world, 0.016);

        let ray = world.get(ray_id).unwrap();
        assert!(ray.colliding);
        assert_relative_eq!(ray.collision_distance, 2.5);
        assert_relative_eq!(ray.collision_point, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(ray.collided_with, Some(floor));
        assert_eq!(collision.rays_tested(), 1);
        assert_eq!(collision.hits(), 1);
    }

    #[test]
    fn test_hit_beyond_max_distance_is_ignored() {
        let (mut world, _) = world_with_floor();
        let sensor = world.create_entity("Left Ray");
        world
            .add_component(sensor, TransformComponent::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let ray_id = world
            .add_component(sensor, ColliderComponent::ray(Vec3::new(0.0, -1.0, 0.0), 1.0))
            .unwrap();

        CollisionSystem::new().update(&mut world, 0.016);

        let ray = world.get(ray_id).unwrap();
        assert!(!ray.colliding);
        assert!(ray.collided_with.is_none());
    }

    #[test]
    fn test_ray_ignores_its_own_parent_box() {
        let mut world = World::new();
        let body = world.create_entity("body");
        world
            .add_component(body, ColliderComponent::aabb(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)))
            .unwrap();
        let body_transform = world.component_id::<TransformComponent>(body).unwrap();
        let sensor = world.create_entity("Forward Ray");
        world.set_parent(sensor, body_transform).unwrap();
        let ray_id = world
            .add_component(sensor, ColliderComponent::ray(Vec3::new(0.0, 0.0, -1.0), 1.0))
            .unwrap();

        CollisionSystem::new().update(&mut world, 0.016);
        assert!(!world.get(ray_id).unwrap().colliding);
    }
}
