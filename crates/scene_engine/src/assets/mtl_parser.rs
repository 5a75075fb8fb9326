//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files into the Phong parameters the graphics system
//! turns into materials.

use crate::foundation::math::Vec3;

/// Parsed MTL material data (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub specular_exponent: f32,
    /// Dissolve/opacity (d) - 0.0 = transparent, 1.0 = opaque
    pub dissolve: f32,
    /// Diffuse texture map (map_Kd)
    pub diffuse_map: Option<String>,
    /// Specular texture map (map_Ks)
    pub specular_map: Option<String>,
    /// Bump/normal map (map_Bump or bump)
    pub normal_map: Option<String>,
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            specular_exponent: 250.0,
            dissolve: 1.0,
            diffuse_map: None,
            specular_map: None,
            normal_map: None,
        }
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents
    ///
    /// Materials come back in definition order, which is the order the
    /// graphics system registers them in.
    pub fn parse(contents: &str) -> Result<Vec<MtlData>, String> {
        let mut materials = Vec::new();
        let mut current: Option<MtlData> = None;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else {
                continue;
            };

            if command == "newmtl" {
                materials.extend(current.take());
                let name = tokens
                    .next()
                    .ok_or_else(|| format!("Line {}: newmtl missing material name", line_num + 1))?;
                current = Some(MtlData {
                    name: name.to_string(),
                    ..Default::default()
                });
                continue;
            }

            // Statements before the first newmtl have nothing to apply to
            let Some(mat) = current.as_mut() else {
                continue;
            };

            match command {
                "Ka" => mat.ambient = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Kd" => mat.diffuse = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Ks" => mat.specular = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Ns" => mat.specular_exponent = Self::parse_f32(&mut tokens, line_num, command)?,
                "d" => mat.dissolve = Self::parse_f32(&mut tokens, line_num, command)?,
                "Tr" => mat.dissolve = 1.0 - Self::parse_f32(&mut tokens, line_num, command)?,
                "map_Kd" => mat.diffuse_map = Some(Self::parse_texture_path(&mut tokens, line_num, command)?),
                "map_Ks" => mat.specular_map = Some(Self::parse_texture_path(&mut tokens, line_num, command)?),
                "map_Bump" | "bump" => {
                    mat.normal_map = Some(Self::parse_texture_path(&mut tokens, line_num, command)?);
                }
                _ => {}
            }
        }

        materials.extend(current);
        Ok(materials)
    }

    fn parse_vec3<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<Vec3, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command)?;
        let g = Self::parse_f32(tokens, line_num, command)?;
        let b = Self::parse_f32(tokens, line_num, command)?;
        Ok(Vec3::new(r, g, b))
    }

    fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<f32, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| format!("Line {}: {} missing value", line_num + 1, command))?;
        token
            .parse::<f32>()
            .map_err(|_| format!("Line {}: {} invalid float value '{}'", line_num + 1, command, token))
    }

    /// Texture paths may contain spaces, so take the rest of the line
    fn parse_texture_path<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<String, String>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(format!("Line {}: {} missing texture path", line_num + 1, command));
        }
        Ok(path.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_definition_order() {
        let mtl_content = r#"
# toon materials
newmtl Skin
Kd 1.0 0.8 0.7
Ns 10.0

newmtl Eyes
Kd 0.0 0.0 0.0
map_Kd eyes diffuse.tga
"#;

        let materials = MtlParser::parse(mtl_content).unwrap();
        assert_eq!(materials.len(), 2);
        assert_eq!(materials[0].name, "Skin");
        assert_eq!(materials[0].diffuse, Vec3::new(1.0, 0.8, 0.7));
        assert_eq!(materials[0].specular_exponent, 10.0);
        assert_eq!(materials[1].name, "Eyes");
        assert_eq!(materials[1].diffuse_map.as_deref(), Some("eyes diffuse.tga"));
    }

    #[test]
    fn test_parse_transparency() {
        let materials = MtlParser::parse("newmtl Glass\nTr 0.3\n").unwrap();

        // Tr = 1.0 - d, so Tr 0.3 means d = 0.7
        assert!((materials[0].dissolve - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_statements_before_newmtl_are_ignored() {
        let materials = MtlParser::parse("Kd 1 0 0\nnewmtl Only\n").unwrap();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].diffuse, MtlData::default().diffuse);
    }

    #[test]
    fn test_bad_float_reports_line() {
        let err = MtlParser::parse("newmtl Bad\nKd 1.0 nope 0.0\n").unwrap_err();
        assert!(err.contains("Line 2"));
    }
}
