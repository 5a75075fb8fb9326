//! Geometry: vertex data, material sets and morph targets

use bytemuck::{Pod, Zeroable};

use crate::assets::{AssetError, ImageData, MeshData};
use crate::foundation::math::Vec3;
use crate::render::MaterialId;

/// 3D vertex data structure for rendering
///
/// `#[repr(C)]` and `Pod` so a backend can upload the vertex array as raw bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, normal, tex_coord }
    }
}

/// Index range drawn with one material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSet {
    /// Material for this range, `None` when the mesh component decides
    pub material: Option<MaterialId>,
    /// First index
    pub index_start: u32,
    /// Index count
    pub index_count: u32,
}

/// Indexed triangle geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Source path or generated name
    pub name: String,
    /// Vertex array
    pub vertices: Vec<Vertex>,
    /// Triangle list
    pub indices: Vec<u32>,
    /// Material ranges; a single-material geometry has one set with no material
    pub material_sets: Vec<MaterialSet>,
    /// Morph target positions, each the same length as `vertices`
    pub blend_shapes: Vec<Vec<[f32; 3]>>,
    /// Bounding box minimum
    pub aabb_min: Vec3,
    /// Bounding box maximum
    pub aabb_max: Vec3,
}

impl Geometry {
    /// Build from parsed mesh data, one material set per group
    pub fn from_mesh(name: impl Into<String>, mesh: &MeshData, materials: &[Option<MaterialId>]) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.uvs)
            .map(|((&p, &n), &uv)| Vertex::new(p, n, uv))
            .collect();

        let material_sets = mesh
            .groups
            .iter()
            .enumerate()
            .map(|(i, group)| MaterialSet {
                material: materials.get(i).copied().flatten(),
                index_start: group.index_start,
                index_count: group.index_count,
            })
            .collect();

        Self::with_bounds(name.into(), vertices, mesh.indices.clone(), material_sets)
    }

    /// Height-field terrain over a `resolution` × `resolution` grid
    ///
    /// The grid is centred on the origin with one world unit per cell. Heights
    /// come from the elevation map's luminance scaled by `height_scale`;
    /// texture coordinates run over `[0, uv_density]`. The elevation map is
    /// consumed.
    #[allow(clippy::cast_precision_loss)]
    pub fn terrain(resolution: u32, uv_density: f32, height_scale: f32, elevation: ImageData) -> Self {
        let resolution = resolution.max(1);
        let side = resolution as usize + 1;
        let half = resolution as f32 * 0.5;
        let step = 1.0 / resolution as f32;

        let heights: Vec<f32> = (0..side * side)
            .map(|i| {
                let (x, z) = (i % side, i / side);
                elevation.sample_luminance(x as f32 * step, z as f32 * step) * height_scale
            })
            .collect();
        drop(elevation);

        let height_at = |x: usize, z: usize| heights[z.min(side - 1) * side + x.min(side - 1)];

        let mut vertices = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                // Central differences, clamped at the borders
                let dx = height_at(x + 1, z) - height_at(x.saturating_sub(1), z);
                let dz = height_at(x, z + 1) - height_at(x, z.saturating_sub(1));
                let normal = Vec3::new(-dx, 2.0, -dz).normalize();

                vertices.push(Vertex::new(
                    [x as f32 - half, height_at(x, z), z as f32 - half],
                    [normal.x, normal.y, normal.z],
                    [x as f32 * step * uv_density, z as f32 * step * uv_density],
                ));
            }
        }

        let side_u32 = resolution + 1;
        let mut indices = Vec::with_capacity(resolution as usize * resolution as usize * 6);
        for z in 0..resolution {
            for x in 0..resolution {
                let i0 = z * side_u32 + x;
                let i1 = i0 + 1;
                let i2 = i0 + side_u32;
                let i3 = i2 + 1;
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let index_count = u32::try_from(indices.len()).unwrap_or(u32::MAX);
        let sets = vec![MaterialSet { material: None, index_start: 0, index_count }];
        Self::with_bounds("terrain".to_string(), vertices, indices, sets)
    }

    /// Attach a morph target
    pub fn add_blend_shape(&mut self, positions: Vec<[f32; 3]>) -> Result<usize, AssetError> {
        if positions.len() != self.vertices.len() {
            return Err(AssetError::MorphTargetMismatch {
                expected: self.vertices.len(),
                found: positions.len(),
            });
        }
        self.blend_shapes.push(positions);
        Ok(self.blend_shapes.len() - 1)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Size of the vertex and index buffers in bytes
    pub fn byte_size(&self) -> usize {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&self.indices);
        let morph_bytes: usize = self
            .blend_shapes
            .iter()
            .map(|shape| bytemuck::cast_slice::<[f32; 3], u8>(shape).len())
            .sum();
        vertex_bytes.len() + index_bytes.len() + morph_bytes
    }

    fn with_bounds(name: String, vertices: Vec<Vertex>, indices: Vec<u32>, material_sets: Vec<MaterialSet>) -> Self {
        let (aabb_min, aabb_max) = bounds(&vertices);
        Self {
            name,
            vertices,
            indices,
            material_sets,
            blend_shapes: Vec::new(),
            aabb_min,
            aabb_max,
        }
    }
}

fn bounds(vertices: &[Vertex]) -> (Vec3, Vec3) {
    if vertices.is_empty() {
        return (Vec3::zeros(), Vec3::zeros());
    }
    vertices.iter().fold(
        (Vec3::repeat(f32::INFINITY), Vec3::repeat(f32::NEG_INFINITY)),
        |(min, max), v| {
            let p = Vec3::from(v.position);
            (min.inf(&p), max.sup(&p))
        },
    )
}
