//! Debug overlay
//!
//! Debug shapes drawn over the rendered frame: sensor rays, light directions
//! and the particle cloud.

pub mod debug_system;
pub mod draw;

pub use debug_system::{DebugFlags, DebugSystem};
pub use draw::{DebugDrawSystem, DebugShape};
