//! Blend-shape animation

use crate::ecs::{BlendShapesComponent, MeshComponent, World};
use crate::foundation::math::utils;
use crate::render::GraphicsSystem;

/// Animation collaborator
///
/// Eases every blend weight toward its target at the component's blend speed.
#[derive(Debug, Default)]
pub struct AnimationSystem {
    animated_entities: usize,
}

impl AnimationSystem {
    /// Create an animation system
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset state
    pub fn init(&mut self) {
        self.animated_entities = 0;
    }

    /// Compare blend-shape names against the morph targets of each mesh
    ///
    /// Returns the number of entities whose counts disagree; those are logged
    /// and still animated.
    pub fn late_init(&mut self, world: &World, graphics: &GraphicsSystem) -> usize {
        let mut mismatches = 0;
        self.animated_entities = 0;

        for (entity, shapes) in world.query::<BlendShapesComponent>() {
            self.animated_entities += 1;
            let Some(mesh) = world.get_component::<MeshComponent>(entity) else {
                log::warn!("Entity {} has blend shapes but no mesh", entity);
                mismatches += 1;
                continue;
            };
            let targets = graphics.geometry(mesh.geometry).map_or(0, |g| g.blend_shapes.len());
            if targets != shapes.len() {
                log::warn!(
                    "Entity {} names {} blend shapes but {} has {} morph targets",
                    entity,
                    shapes.len(),
                    mesh.geometry,
                    targets
                );
                mismatches += 1;
            }
        }

        log::debug!("Animation late init: {} animated entities", self.animated_entities);
        mismatches
    }

    /// Advance blend weights
    pub fn update(&mut self, world: &mut World, dt: f32) {
        for shapes in world.components_mut::<BlendShapesComponent>() {
            let step = shapes.blend_speed * dt;
            for (weight, target) in shapes.weights.iter_mut().zip(&shapes.targets) {
                *weight = utils::move_towards(*weight, *target, step);
            }
        }
    }

    /// Entities with blend shapes seen at late init
    pub fn animated_entities(&self) -> usize {
        self.animated_entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_ease_toward_target() {
        let mut world = World::new();
        let toon = world.create_entity("toon");
        let mut shapes = BlendShapesComponent::default();
        shapes.add_shape("happy");
        shapes.add_shape("angry");
        shapes.set_target("happy", 1.0);
        world.add_component(toon, shapes).unwrap();

        let mut animation = AnimationSystem::new();
        animation.update(&mut world, 0.25);

        let shapes = world.get_component::<BlendShapesComponent>(toon).unwrap();
        assert_relative_eq!(shapes.weight("happy").unwrap(), 0.5);
        assert_relative_eq!(shapes.weight("angry").unwrap(), 0.0);

        animation.update(&mut world, 1.0);
        let shapes = world.get_component::<BlendShapesComponent>(toon).unwrap();
        assert_relative_eq!(shapes.weight("happy").unwrap(), 1.0);
    }

    #[test]
    fn test_late_init_reports_entities_without_mesh() {
        let mut world = World::new();
        let toon = world.create_entity("toon");
        let mut shapes = BlendShapesComponent::default();
        shapes.add_shape("base");
        world.add_component(toon, shapes).unwrap();

        let mut animation = AnimationSystem::new();
        assert_eq!(animation.late_init(&world, &GraphicsSystem::new()), 1);
        assert_eq!(animation.animated_entities(), 1);
    }
}
