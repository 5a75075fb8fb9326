//! Scripted behaviours

use crate::ecs::World;

/// A behaviour ticked by the script system
pub trait Script {
    /// Human-readable name for this script
    fn name(&self) -> &str;

    /// Called once during late init, after the scene exists
    fn init(&mut self, _world: &mut World) {}

    /// Called once per frame
    fn update(&mut self, world: &mut World, dt: f32);
}

/// Script collaborator
///
/// Scripts run in registration order.
#[derive(Default)]
pub struct ScriptSystem {
    scripts: Vec<Box<dyn Script>>,
    initialized: bool,
}

impl ScriptSystem {
    /// Create an empty script system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script; scripts added after late init are initialized on the spot
    pub fn add_script(&mut self, world: &mut World, mut script: Box<dyn Script>) {
        if self.initialized {
            script.init(world);
        }
        log::debug!("Registered script '{}'", script.name());
        self.scripts.push(script);
    }

    /// Initialize every registered script
    pub fn late_init(&mut self, world: &mut World) {
        for script in &mut self.scripts {
            script.init(world);
        }
        self.initialized = true;
        log::debug!("Script late init: {} script(s)", self.scripts.len());
    }

    /// Tick every script
    pub fn update(&mut self, world: &mut World, dt: f32) {
        for script in &mut self.scripts {
            script.update(world, dt);
        }
    }

    /// Number of registered scripts
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether no scripts are registered
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::TransformComponent;
    use crate::foundation::math::Vec3;

    struct Spinner {
        inits: u32,
    }

    impl Script for Spinner {
        fn name(&self) -> &str {
            "spinner"
        }

        fn init(&mut self, _world: &mut World) {
            self.inits += 1;
        }

        fn update(&mut self, world: &mut World, dt: f32) {
            for transform in world.components_mut::<TransformComponent>() {
                transform.translate(Vec3::new(dt, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn test_scripts_run_after_late_init() {
        let mut world = World::new();
        let entity = world.create_entity("moved");
        let mut scripts = ScriptSystem::new();
        scripts.add_script(&mut world, Box::new(Spinner { inits: 0 }));
        assert_eq!(scripts.len(), 1);

        scripts.late_init(&mut world);
        scripts.update(&mut world, 0.5);
        scripts.update(&mut world, 0.5);

        let transform = world.get_component::<TransformComponent>(entity).unwrap();
        assert_eq!(transform.position.x, 1.0);
    }
}
