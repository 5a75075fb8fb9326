//! Entity-Component-System implementation
//!
//! The store behind the scene: integer entity identities, typed component
//! storages keyed by entity, generation-checked component identities and the
//! single main-camera slot.

pub mod entity;
pub mod component;
pub mod storage;
pub mod world;
pub mod components;

pub use entity::Entity;
pub use component::{Component, ComponentId};
pub use world::World;
pub use components::{
    BlendShapesComponent, CameraComponent, ColliderComponent, ColliderKind, LightComponent,
    LightType, MeshComponent, RenderMode, TransformComponent,
};

use thiserror::Error;

/// Store-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never created by this world
    #[error("Unknown entity {0}")]
    UnknownEntity(Entity),

    /// The storage registered for a component type holds another type
    #[error("Component storage for {0} has the wrong type")]
    StorageMismatch(&'static str),

    /// The entity has no component of the requested type
    #[error("Entity {entity} has no {component} component")]
    MissingComponent {
        /// Entity that was queried
        entity: Entity,
        /// Requested component type
        component: &'static str,
    },

    /// Parent assignment rejected
    #[error("Invalid parent for entity {child}: {reason}")]
    InvalidParent {
        /// Entity whose transform was being parented
        child: Entity,
        /// Why the assignment was refused
        reason: &'static str,
    },
}
