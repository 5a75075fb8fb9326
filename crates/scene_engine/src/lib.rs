//! # Scene Engine
//!
//! Scene bootstrap and per-frame orchestration for a small real-time 3D
//! application built on an Entity-Component-System.
//!
//! ## Features
//!
//! - **ECS Store**: Typed component storages with stable component identities
//! - **Scene Bootstrap**: Character, terrain, skybox, light and camera set up in one pass
//! - **Frame Scheduling**: Subsystems advanced in a validated, declarative order
//! - **Camera Rigs**: Free-flying camera and a ground-bound player with sensor rays
//! - **Asset Parsing**: Wavefront OBJ/MTL and image loading behind a parser seam
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GameConfig::load_or_default("scene.toml")?;
//!     let (width, height) = (config.window.width, config.window.height);
//!     let mut game = Game::new(config);
//!     game.init(width, height, &FileAssetParser::new())?;
//!
//!     let mut timer = Timer::new();
//!     loop {
//!         let dt = timer.tick();
//!         game.update(dt)?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod systems;
pub mod debug;
pub mod game;

pub use game::{FrameOutcome, Game, GameError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Game, GameError, FrameOutcome,
        config::{Config, GameConfig},
        foundation::{
            math::{Vec2, Vec3, Vec4, Mat4},
            time::Timer,
        },
        ecs::{
            World, Entity, Component, ComponentId,
            TransformComponent, CameraComponent, MeshComponent, RenderMode,
            LightComponent, ColliderComponent, BlendShapesComponent,
        },
        assets::{AssetParser, FileAssetParser, AssetError},
        render::{GraphicsSystem, Material},
        systems::{ControlMode, MoveKeys, Script},
        game::{FrameSchedule, FrameStage},
    };
}
