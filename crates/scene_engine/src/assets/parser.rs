//! Parsing collaborator seam
//!
//! The scene bootstrap asks an [`AssetParser`] for every file it needs.
//! [`FileAssetParser`] reads the real asset tree; tests provide their own
//! in-memory implementation.

use std::fs;
use std::path::Path;

use super::{AssetError, CubemapData, ImageData, MaterialGroup, MeshData, MtlData, MtlParser, ObjLoader};

/// Source of parsed asset data
pub trait AssetParser {
    /// Parse a material library `file` located in `dir`
    fn parse_material_file(&self, dir: &str, file: &str) -> Result<Vec<MtlData>, AssetError>;

    /// Parse a mesh, merging all material groups into one
    fn parse_mesh(&self, path: &str) -> Result<MeshData, AssetError>;

    /// Parse a mesh keeping its per-material groups
    fn parse_mesh_multi(&self, path: &str) -> Result<MeshData, AssetError>;

    /// Parse an image into owned RGBA pixels
    fn parse_texture(&self, path: &str) -> Result<ImageData, AssetError>;

    /// Read a shader source file
    fn read_shader_source(&self, path: &str) -> Result<String, AssetError>;

    /// Parse six cube faces in +X, -X, +Y, -Y, +Z, -Z order
    fn parse_cubemap(&self, faces: &[String; 6]) -> Result<CubemapData, AssetError> {
        let [right, left, top, bottom, front, back] = faces;
        Ok(CubemapData {
            faces: [
                self.parse_texture(right)?,
                self.parse_texture(left)?,
                self.parse_texture(top)?,
                self.parse_texture(bottom)?,
                self.parse_texture(front)?,
                self.parse_texture(back)?,
            ],
        })
    }
}

/// Parser reading from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileAssetParser;

impl FileAssetParser {
    /// Create a disk-backed parser
    pub fn new() -> Self {
        Self
    }

    fn read_text(path: &str) -> Result<String, AssetError> {
        fs::read_to_string(path).map_err(|e| AssetError::io(path, e))
    }
}

impl AssetParser for FileAssetParser {
    fn parse_material_file(&self, dir: &str, file: &str) -> Result<Vec<MtlData>, AssetError> {
        let path = Path::new(dir).join(file);
        let path = path.to_string_lossy();
        log::debug!("Parsing material library {}", path);
        let contents = Self::read_text(&path)?;
        MtlParser::parse(&contents).map_err(|message| AssetError::parse(&path, message))
    }

    fn parse_mesh(&self, path: &str) -> Result<MeshData, AssetError> {
        let mut mesh = self.parse_mesh_multi(path)?;
        let index_count = mesh.indices.len();
        mesh.groups.clear();
        mesh.groups.push(MaterialGroup {
            material_name: String::new(),
            index_start: 0,
            index_count: u32::try_from(index_count)
                .map_err(|_| AssetError::parse(path, "index buffer too large"))?,
        });
        Ok(mesh)
    }

    fn parse_mesh_multi(&self, path: &str) -> Result<MeshData, AssetError> {
        log::debug!("Parsing mesh {}", path);
        let contents = Self::read_text(path)?;
        let mesh = ObjLoader::parse(&contents).map_err(|message| AssetError::parse(path, message))?;
        log::info!(
            "Loaded mesh {} ({} vertices, {} material groups)",
            path,
            mesh.vertex_count(),
            mesh.groups.len()
        );
        Ok(mesh)
    }

    fn parse_texture(&self, path: &str) -> Result<ImageData, AssetError> {
        ImageData::from_file(path)
    }

    fn read_shader_source(&self, path: &str) -> Result<String, AssetError> {
        Self::read_text(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_parser_reads_obj_and_mtl() {
        let dir = std::env::temp_dir().join(format!("scene_engine_parser_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl A\nf 1 2 3\n").unwrap();
        fs::write(dir.join("tri.mtl"), "newmtl A\nKd 1 0 0\n").unwrap();

        let parser = FileAssetParser::new();
        let dir_str = dir.to_string_lossy().to_string();
        let mesh = parser.parse_mesh(&dir.join("tri.obj").to_string_lossy()).unwrap();
        let materials = parser.parse_material_file(&dir_str, "tri.mtl").unwrap();

        assert_eq!(mesh.groups.len(), 1);
        assert!(mesh.groups[0].material_name.is_empty());
        assert_eq!(materials[0].name, "A");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileAssetParser::new().read_shader_source("missing/shader.vert").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
