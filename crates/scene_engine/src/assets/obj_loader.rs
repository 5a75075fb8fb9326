//! OBJ file loader for 3D models
//!
//! Produces flat, unindexed-per-corner mesh data: every face corner becomes a
//! vertex, polygons are fan-triangulated, and `usemtl` statements split the
//! index buffer into material groups.

/// Contiguous run of indices drawn with one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGroup {
    /// Material name from `usemtl`, empty when the file never names one
    pub material_name: String,
    /// First index of the run
    pub index_start: u32,
    /// Number of indices in the run
    pub index_count: u32,
}

/// Parsed mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, one per position
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates, one per position
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list
    pub indices: Vec<u32>,
    /// Material runs over `indices`
    pub groups: Vec<MaterialGroup>,
    /// `mtllib` file named by the OBJ, if any
    pub material_library: Option<String>,
}

impl MeshData {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Wavefront OBJ parser
pub struct ObjLoader;

impl ObjLoader {
    /// Parse OBJ text into mesh data
    pub fn parse(contents: &str) -> Result<MeshData, String> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut mesh = MeshData::default();
        let mut current_material = String::new();
        let mut group_start = 0u32;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_floats::<3>(&parts, line_num)?),
                "vn" => normals.push(parse_floats::<3>(&parts, line_num)?),
                "vt" => tex_coords.push(parse_floats::<2>(&parts, line_num)?),
                "mtllib" => mesh.material_library = parts.get(1).map(|s| (*s).to_string()),
                "usemtl" => {
                    close_group(&mut mesh, &current_material, group_start);
                    group_start = index_len(&mesh);
                    current_material = parts.get(1).map(|s| (*s).to_string()).unwrap_or_default();
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(format!("Line {}: face needs at least three vertices", line_num + 1));
                    }

                    let first = index_len_vertices(&mesh);
                    for corner in &parts[1..] {
                        let (position, tex_coord, normal) =
                            resolve_corner(corner, &positions, &tex_coords, &normals, line_num)?;
                        mesh.positions.push(position);
                        mesh.uvs.push(tex_coord);
                        mesh.normals.push(normal);
                    }

                    // Fan triangulation
                    let corners = (parts.len() - 1) as u32;
                    for i in 1..corners - 1 {
                        mesh.indices.extend_from_slice(&[first, first + i, first + i + 1]);
                    }
                }
                _ => {}
            }
        }

        if mesh.positions.is_empty() {
            return Err("No vertices found in OBJ file".to_string());
        }

        close_group(&mut mesh, &current_material, group_start);
        Ok(mesh)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn index_len(mesh: &MeshData) -> u32 {
    mesh.indices.len() as u32
}

#[allow(clippy::cast_possible_truncation)]
fn index_len_vertices(mesh: &MeshData) -> u32 {
    mesh.positions.len() as u32
}

fn close_group(mesh: &mut MeshData, material: &str, start: u32) {
    let end = index_len(mesh);
    if end > start {
        mesh.groups.push(MaterialGroup {
            material_name: material.to_string(),
            index_start: start,
            index_count: end - start,
        });
    }
}

fn parse_floats<const N: usize>(parts: &[&str], line_num: usize) -> Result<[f32; N], String> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        let token = parts
            .get(i + 1)
            .ok_or_else(|| format!("Line {}: {} expects {} values", line_num + 1, parts[0], N))?;
        *value = token
            .parse()
            .map_err(|_| format!("Line {}: invalid number '{}'", line_num + 1, token))?;
    }
    Ok(values)
}

/// Resolve one `v/vt/vn` face corner; OBJ indices are 1-based and may be negative
fn resolve_corner(
    corner: &str,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    line_num: usize,
) -> Result<([f32; 3], [f32; 2], [f32; 3]), String> {
    let mut fields = corner.split('/');
    let position_field = fields.next().unwrap_or_default();
    let position_idx = resolve_index(position_field, positions.len())
        .ok_or_else(|| format!("Line {}: bad position index '{}'", line_num + 1, corner))?;
    let position = positions
        .get(position_idx)
        .copied()
        .ok_or_else(|| format!("Line {}: position index out of bounds", line_num + 1))?;

    let tex_coord = fields
        .next()
        .and_then(|field| resolve_index(field, tex_coords.len()))
        .and_then(|idx| tex_coords.get(idx).copied())
        .unwrap_or([0.0, 0.0]);

    let normal = fields
        .next()
        .and_then(|field| resolve_index(field, normals.len()))
        .and_then(|idx| normals.get(idx).copied())
        .unwrap_or([0.0, 1.0, 0.0]);

    Ok((position, tex_coord, normal))
}

fn resolve_index(field: &str, len: usize) -> Option<usize> {
    let raw: i64 = field.parse().ok()?;
    match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(i64::try_from(len).ok()? + r).ok(),
    }
}
