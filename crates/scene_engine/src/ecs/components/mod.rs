//! ECS Components module
//!
//! Pure data records attached to entities; all behaviour lives in the systems.

pub mod transform;
pub mod camera;
pub mod mesh;
pub mod lighting;
pub mod collision;
pub mod blend_shapes;

pub use transform::TransformComponent;
pub use camera::CameraComponent;
pub use mesh::{MeshComponent, RenderMode};
pub use lighting::{LightComponent, LightType, LightFactory};
pub use collision::{ColliderComponent, ColliderKind};
pub use blend_shapes::BlendShapesComponent;
