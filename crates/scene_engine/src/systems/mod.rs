//! Collaborator subsystems advanced by the frame scheduler
//!
//! Each system is plain data plus `init`/`late_init`/`update` entry points;
//! none of them holds a reference to the world between calls.

pub mod animation;
pub mod collision;
pub mod control;
pub mod gui;
pub mod particles;
pub mod script;

pub use animation::AnimationSystem;
pub use collision::{Aabb, CollisionSystem, Ray};
pub use control::{ControlMode, ControlSystem, FpsColliderSlots, MoveKeys};
pub use gui::{GuiAnchor, GuiLabel, GuiSystem};
pub use particles::{Particle, ParticleEmitter};
pub use script::{Script, ScriptSystem};
