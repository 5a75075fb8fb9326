//! Shader program sources

use crate::assets::{AssetError, AssetParser};

/// A vertex/fragment pair loaded from disk
///
/// Sources are kept so a backend can compile them later; loading only checks
/// that each stage declares an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderProgram {
    /// Vertex stage path
    pub vertex_path: String,
    /// Fragment stage path
    pub fragment_path: String,
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
}

impl ShaderProgram {
    /// Read and check both stages
    pub fn load(parser: &dyn AssetParser, vertex_path: &str, fragment_path: &str) -> Result<Self, AssetError> {
        let vertex_source = parser.read_shader_source(vertex_path)?;
        check_entry_point(vertex_path, &vertex_source)?;
        let fragment_source = parser.read_shader_source(fragment_path)?;
        check_entry_point(fragment_path, &fragment_source)?;

        Ok(Self {
            vertex_path: vertex_path.to_string(),
            fragment_path: fragment_path.to_string(),
            vertex_source,
            fragment_source,
        })
    }
}

fn check_entry_point(path: &str, source: &str) -> Result<(), AssetError> {
    if source.contains("main") {
        Ok(())
    } else {
        Err(AssetError::Shader {
            path: path.to_string(),
            message: "no entry point".to_string(),
        })
    }
}
