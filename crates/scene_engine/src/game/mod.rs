//! Scene orchestration
//!
//! [`Game`] owns the world and every collaborator subsystem. `init` runs the
//! one-shot scene bootstrap, `update` advances the subsystems in the order of
//! its [`FrameSchedule`], and `update_viewports` follows surface resizes.

pub mod composition;
pub mod schedule;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use schedule::{FrameSchedule, FrameStage, ScheduleError};

use thiserror::Error;

use crate::assets::{AssetError, AssetParser};
use crate::config::{ConfigError, GameConfig};
use crate::debug::DebugSystem;
use crate::ecs::{
    BlendShapesComponent, CameraComponent, EcsError, Entity, LightComponent, MeshComponent, RenderMode,
    TransformComponent, World,
};
use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::{GraphicsSystem, Material};
use crate::systems::{AnimationSystem, CollisionSystem, ControlSystem, GuiSystem, ParticleEmitter, ScriptSystem};

/// Where the deformable character is placed
const TOON_POSITION: [f32; 3] = [500.0, 0.0, 0.0];

/// Morph target names, in geometry order
const TOON_BLEND_SHAPES: [&str; 3] = ["happy", "angry", "base"];

/// Skybox faces in +X, -X, +Y, -Y, +Z, -Z order
const SKYBOX_FACES: [&str; 6] = ["right.tga", "left.tga", "top.tga", "bottom.tga", "front.tga", "back.tga"];

/// Orchestration errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Store error
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Asset or resource registry error
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid frame schedule
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Bootstrap already ran
    #[error("Scene is already initialized")]
    AlreadyInitialized,

    /// A frame was requested before bootstrap
    #[error("Scene is not initialized")]
    NotInitialized,

    /// An earlier bootstrap failed partway and left a partial scene
    #[error("Scene bootstrap already failed; create a new game to retry")]
    BootstrapFailed,
}

/// Progress of the one-shot scene bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootstrapState {
    Pending,
    Failed,
    Ready,
}

/// What a call to [`Game::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No camera exists; nothing was advanced
    NoCamera,
    /// Every scheduled stage ran
    Advanced,
}

/// The application: world, subsystems and their schedule
pub struct Game {
    config: GameConfig,
    world: World,
    schedule: FrameSchedule,
    control: ControlSystem,
    collision: CollisionSystem,
    animation: AnimationSystem,
    scripts: ScriptSystem,
    graphics: GraphicsSystem,
    gui: GuiSystem,
    debug: DebugSystem,
    particles: Option<ParticleEmitter>,
    window_width: u32,
    window_height: u32,
    bootstrap: BootstrapState,
    frame_count: u64,
    last_frame: Vec<FrameStage>,
}

impl Game {
    /// Game with the standard frame schedule
    pub fn new(config: GameConfig) -> Self {
        Self {
            window_width: config.window.width,
            window_height: config.window.height,
            config,
            world: World::new(),
            schedule: FrameSchedule::standard(),
            control: ControlSystem::new(),
            collision: CollisionSystem::new(),
            animation: AnimationSystem::new(),
            scripts: ScriptSystem::new(),
            graphics: GraphicsSystem::new(),
            gui: GuiSystem::new(),
            debug: DebugSystem::new(),
            particles: None,
            bootstrap: BootstrapState::Pending,
            frame_count: 0,
            last_frame: Vec::new(),
        }
    }

    /// Replace the frame schedule
    pub fn set_schedule(&mut self, schedule: FrameSchedule) -> Result<(), GameError> {
        schedule.validate()?;
        self.schedule = schedule;
        Ok(())
    }

    /// Scene bootstrap; runs once, before any frame
    ///
    /// A failed bootstrap is not retried on the same game: later calls return
    /// [`GameError::BootstrapFailed`].
    pub fn init(&mut self, width: u32, height: u32, parser: &dyn AssetParser) -> Result<(), GameError> {
        match self.bootstrap {
            BootstrapState::Ready => return Err(GameError::AlreadyInitialized),
            BootstrapState::Failed => return Err(GameError::BootstrapFailed),
            BootstrapState::Pending => {}
        }

        if let Err(e) = self.bootstrap_scene(width, height, parser) {
            log::error!("Scene bootstrap failed: {}", e);
            self.bootstrap = BootstrapState::Failed;
            return Err(e);
        }
        self.bootstrap = BootstrapState::Ready;
        log::info!(
            "Scene ready: {} entities, {} camera(s)",
            self.world.entity_count(),
            self.world.count::<CameraComponent>()
        );
        Ok(())
    }

    fn bootstrap_scene(&mut self, width: u32, height: u32, parser: &dyn AssetParser) -> Result<(), GameError> {
        self.window_width = width;
        self.window_height = height;
        let config = self.config.clone();

        // Subsystems that do not need scene content
        self.control.init();
        self.collision.init();
        self.graphics.init(width, height, &config.asset_root);
        self.gui.init(width, height);
        self.animation.init();
        self.graphics.screen_background_color = Vec4::from(config.background_color);

        // Deformable character
        log::info!("Loading character");
        let blend_shader = self.graphics.load_shader(
            parser,
            &config.shader("phong_blend.vert"),
            &config.shader("phong.frag"),
        )?;
        self.graphics
            .load_material_library(parser, &config.asset("toon/"), "toon_base.mtl", blend_shader)?;
        self.compose_toon(parser, &config)?;

        // Shaders and procedural materials
        log::info!("Loading shaders and materials");
        let cubemap_shader = self.graphics.load_shader(parser, &config.shader("cubemap.vert"), &config.shader("cubemap.frag"))?;
        let phong_shader = self.graphics.load_shader(parser, &config.shader("phong.vert"), &config.shader("phong.frag"))?;
        let reflection_shader =
            self.graphics.load_shader(parser, &config.shader("reflection.vert"), &config.shader("reflection.frag"))?;
        let terrain_shader = self.graphics.load_shader(parser, &config.shader("phong.vert"), &config.shader("terrain.frag"))?;
        log::debug!("Reflection shader {} available", reflection_shader);

        let mut blue = Material::new("Blue", phong_shader);
        blue.diffuse_map = Some(self.graphics.load_texture(parser, &config.asset("block_blue.tga"))?);
        blue.specular = Vec3::zeros();
        self.graphics.add_material(blue);

        let mut terrain_material = Material::new("Terrain", terrain_shader);
        terrain_material.specular = Vec3::zeros();
        terrain_material.diffuse_map = Some(self.graphics.load_texture(parser, &config.asset("terrain/grass01.tga"))?);
        terrain_material.diffuse_map_2 = Some(self.graphics.load_texture(parser, &config.asset("terrain/cliffs.tga"))?);
        terrain_material.normal_map = Some(self.graphics.load_texture(parser, &config.asset("terrain/grass01_n.tga"))?);
        let (noise_map, elevation) = self
            .graphics
            .load_texture_with_pixels(parser, &config.asset("terrain/heightmap1.tga"))?;
        terrain_material.noise_map = Some(noise_map);
        terrain_material.height = config.terrain.height;
        terrain_material.uv_scale = Vec2::from(config.terrain.uv_tiling);
        let terrain_material = self.graphics.add_material(terrain_material);

        // Environment geometry
        log::info!("Building environment");
        let cubemap_geometry = self.graphics.create_geometry_from_file(parser, &config.asset("cubemap.obj"))?;
        let faces = SKYBOX_FACES.map(|face| config.asset(&format!("skybox/{}", face)));
        let cubemap = self.graphics.load_cubemap(parser, &faces)?;
        self.graphics.set_environment(cubemap, cubemap_geometry, cubemap_shader);

        // The elevation pixels are consumed here
        let terrain_geometry = self.graphics.create_terrain_geometry(
            config.terrain.resolution,
            config.terrain.uv_density,
            config.terrain.height,
            elevation,
        );

        // Environment entities
        let terrain = self.world.create_entity("Terrain");
        self.world
            .add_component(terrain, MeshComponent::new(terrain_geometry, terrain_material, RenderMode::Forward))?;
        let light = self.world.create_entity("Directional Light");
        self.world.add_component(light, LightComponent::default())?;

        // Particles and debug overlay
        let mut particles = ParticleEmitter::new(config.particles.clone());
        particles.init();
        self.debug.init(&self.graphics, &particles);
        self.particles = Some(particles);

        // Camera
        self.create_free_camera(Vec3::from(config.camera.position), Vec3::from(config.camera.forward))?;

        // Late init, now that every resource and entity exists
        self.graphics.late_init(&self.world)?;
        self.scripts.late_init(&mut self.world);
        self.animation.late_init(&self.world, &self.graphics);
        self.debug.late_init(&self.world);
        self.debug.set_active(config.debug_overlay);
        Ok(())
    }

    fn compose_toon(&mut self, parser: &dyn AssetParser, config: &GameConfig) -> Result<Entity, GameError> {
        let toon = self.world.create_entity("toon");
        let geometry = self
            .graphics
            .create_multi_material_geometry(parser, &config.asset("toon/toon_base.obj"))?;
        self.world.add_component(toon, MeshComponent::multi_material(geometry))?;
        self.world
            .add_component(toon, TransformComponent::from_position(Vec3::from(TOON_POSITION)))?;

        self.graphics
            .add_blend_shape_from_file(parser, geometry, &config.asset("toon/toon_happy.obj"))?;

        let mut shapes = BlendShapesComponent::default();
        for name in TOON_BLEND_SHAPES {
            shapes.add_shape(name);
        }
        self.world.add_component(toon, shapes)?;
        Ok(toon)
    }

    /// Advance one frame
    ///
    /// With no camera in the world nothing runs and the frame is reported as
    /// [`FrameOutcome::NoCamera`].
    pub fn update(&mut self, dt: f32) -> Result<FrameOutcome, GameError> {
        self.last_frame.clear();
        if self.world.count::<CameraComponent>() == 0 {
            log::warn!("There is no camera set!");
            return Ok(FrameOutcome::NoCamera);
        }
        if self.bootstrap != BootstrapState::Ready {
            return Err(GameError::NotInitialized);
        }

        for index in 0..self.schedule.len() {
            let stage = self.schedule.stages()[index];
            self.run_stage(stage, dt);
            self.last_frame.push(stage);
        }
        self.frame_count += 1;
        Ok(FrameOutcome::Advanced)
    }

    fn run_stage(&mut self, stage: FrameStage, dt: f32) {
        match stage {
            FrameStage::Control => self.control.update(&mut self.world, dt),
            FrameStage::Collision => self.collision.update(&mut self.world, dt),
            FrameStage::Animation => self.animation.update(&mut self.world, dt),
            FrameStage::Scripting => self.scripts.update(&mut self.world, dt),
            FrameStage::Rendering => self.graphics.update(&self.world, dt),
            FrameStage::Particles => {
                if let Some(particles) = &mut self.particles {
                    particles.update(dt);
                }
            }
            FrameStage::Gui => self.gui.update(dt),
            FrameStage::Debug => {
                if let Some(particles) = &self.particles {
                    self.debug.update(&self.world, &self.graphics, particles, dt);
                }
            }
        }
    }

    /// Follow a surface resize
    pub fn update_viewports(&mut self, width: u32, height: u32) {
        if viewport::resize_cameras(&mut self.world, width, height).is_none() {
            return;
        }
        self.window_width = width;
        self.window_height = height;
        self.graphics.update_main_viewport(width, height);
        self.gui.resize(width, height);
    }

    /// Compose a free camera using the current surface aspect
    pub fn create_free_camera(&mut self, position: Vec3, forward: Vec3) -> Result<Entity, GameError> {
        let aspect = composition::aspect_ratio(self.window_width, self.window_height);
        Ok(composition::create_free_camera(&mut self.world, &mut self.control, position, forward, aspect)?)
    }

    /// Compose the FPS player rig using the current surface aspect
    pub fn create_player(&mut self) -> Result<Entity, GameError> {
        let aspect = composition::aspect_ratio(self.window_width, self.window_height);
        Ok(composition::create_player(&mut self.world, &mut self.control, aspect)?)
    }

    /// Whether bootstrap has completed
    pub fn is_initialized(&self) -> bool {
        self.bootstrap == BootstrapState::Ready
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stages run by the last `update`, in order
    pub fn last_frame_stages(&self) -> &[FrameStage] {
        &self.last_frame
    }

    /// Current surface size
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Configuration the game was built with
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Frame schedule
    pub fn schedule(&self) -> &FrameSchedule {
        &self.schedule
    }

    /// Entity/component store
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable entity/component store
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Control subsystem
    pub fn control(&self) -> &ControlSystem {
        &self.control
    }

    /// Mutable control subsystem, for feeding input
    pub fn control_mut(&mut self) -> &mut ControlSystem {
        &mut self.control
    }

    /// Graphics subsystem
    pub fn graphics(&self) -> &GraphicsSystem {
        &self.graphics
    }

    /// GUI subsystem
    pub fn gui(&self) -> &GuiSystem {
        &self.gui
    }

    /// Debug overlay
    pub fn debug(&self) -> &DebugSystem {
        &self.debug
    }

    /// Mutable debug overlay
    pub fn debug_mut(&mut self) -> &mut DebugSystem {
        &mut self.debug
    }

    /// Particle emitter, once bootstrap created it
    pub fn particles(&self) -> Option<&ParticleEmitter> {
        self.particles.as_ref()
    }

    /// Register a script with the world
    pub fn add_script(&mut self, script: Box<dyn crate::systems::Script>) {
        self.scripts.add_script(&mut self.world, script);
    }
}
