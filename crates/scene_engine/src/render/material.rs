//! Material description

use crate::assets::MtlData;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::{ShaderId, TextureId};

/// Phong material bound to a shader program
///
/// Terrain materials also use the second diffuse layer, the noise
/// (elevation) map, `height` and `uv_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Name, matched against `usemtl` statements
    pub name: String,
    /// Shader program drawing this material
    pub shader: ShaderId,
    /// Ambient color
    pub ambient: Vec3,
    /// Diffuse color
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
    /// Specular exponent
    pub specular_gloss: f32,
    /// Opacity
    pub transparency: f32,
    /// Primary diffuse texture
    pub diffuse_map: Option<TextureId>,
    /// Second diffuse layer
    pub diffuse_map_2: Option<TextureId>,
    /// Tangent-space normal map
    pub normal_map: Option<TextureId>,
    /// Specular map
    pub specular_map: Option<TextureId>,
    /// Greyscale elevation map
    pub noise_map: Option<TextureId>,
    /// Height scale for the elevation map
    pub height: f32,
    /// UV tiling factor
    pub uv_scale: Vec2,
}

impl Material {
    /// Plain white material
    pub fn new(name: impl Into<String>, shader: ShaderId) -> Self {
        Self {
            name: name.into(),
            shader,
            ambient: Vec3::new(0.1, 0.1, 0.1),
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::new(1.0, 1.0, 1.0),
            specular_gloss: 80.0,
            transparency: 1.0,
            diffuse_map: None,
            diffuse_map_2: None,
            normal_map: None,
            specular_map: None,
            noise_map: None,
            height: 0.0,
            uv_scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Material from parsed MTL colours; texture maps are bound by the caller
    pub fn from_mtl(data: &MtlData, shader: ShaderId) -> Self {
        Self {
            ambient: data.ambient,
            diffuse: data.diffuse,
            specular: data.specular,
            specular_gloss: data.specular_exponent,
            transparency: data.dissolve,
            ..Self::new(data.name.clone(), shader)
        }
    }
}
