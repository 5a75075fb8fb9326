//! Asset parsing collaborators
//!
//! Everything that turns files into engine-side data: Wavefront OBJ meshes,
//! MTL material libraries, images and shader sources. The scene bootstrap only
//! talks to the [`AssetParser`] trait, so tests can swap the disk for memory.

pub mod image_loader;
pub mod obj_loader;
pub mod mtl_parser;
pub mod parser;

pub use image_loader::{CubemapData, ImageData};
pub use obj_loader::{MaterialGroup, MeshData, ObjLoader};
pub use mtl_parser::{MtlData, MtlParser};
pub use parser::{AssetParser, FileAssetParser};

use thiserror::Error;

/// Asset loading and resource registry errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// File content is malformed
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Offending path
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// Image decoding failed
    #[error("Failed to load image {path}: {message}")]
    Image {
        /// Offending path
        path: String,
        /// Decoder diagnostic
        message: String,
    },

    /// Shader source unusable
    #[error("Shader {path} rejected: {message}")]
    Shader {
        /// Offending path
        path: String,
        /// Reason
        message: String,
    },

    /// Morph target does not line up with its base geometry
    #[error("Morph target has {found} vertices, base geometry has {expected}")]
    MorphTargetMismatch {
        /// Base vertex count
        expected: usize,
        /// Morph target vertex count
        found: usize,
    },

    /// A resource id does not name a registered resource
    #[error("Unknown {kind} id {id}")]
    UnknownResource {
        /// Resource kind ("geometry", "material", ...)
        kind: &'static str,
        /// Raw index
        id: u32,
    },
}

impl AssetError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn parse(path: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
