//! CPU-side rendering registry
//!
//! Holds everything the renderer needs to know about the scene without owning
//! a GPU: shader programs, materials, textures, geometries, the environment
//! (skybox) and the main viewport. Each frame the graphics system turns mesh
//! entities into an ordered draw list.
//!
//! Resources live in append-only registries and are addressed by small typed
//! ids, so a mesh component can name its geometry and material without
//! borrowing the registry.

pub mod geometry;
pub mod graphics_system;
pub mod material;
pub mod shader;
pub mod texture;

pub use geometry::{Geometry, MaterialSet, Vertex};
pub use graphics_system::{DrawCommand, Environment, FrameStats, GraphicsSystem};
pub use material::Material;
pub use shader::ShaderProgram;
pub use texture::{Texture, TextureData};

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Registry kind, used in error messages
            pub const KIND: &'static str = $kind;

            #[allow(clippy::cast_possible_truncation)]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// Position in the owning registry
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn unknown(self) -> $crate::assets::AssetError {
                $crate::assets::AssetError::UnknownResource { kind: Self::KIND, id: self.0 }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", Self::KIND, self.0)
            }
        }
    };
}

resource_id!(
    /// Index of a registered geometry
    GeometryId, "geometry"
);
resource_id!(
    /// Index of a registered material
    MaterialId, "material"
);
resource_id!(
    /// Index of a compiled shader program
    ShaderId, "shader"
);
resource_id!(
    /// Index of a registered texture or cubemap
    TextureId, "texture"
);
