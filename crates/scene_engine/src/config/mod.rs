//! Configuration system
//!
//! Every literal the scene bootstrap needs lives in [`GameConfig`]. Its
//! `Default` reproduces the shipped scene exactly, so a config file is optional.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults when the file is absent
    fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Initial output surface size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Height-field terrain parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid resolution (vertices per side)
    pub resolution: u32,
    /// Texture coordinate density across the grid
    pub uv_density: f32,
    /// Maximum terrain height, also written to the terrain material
    pub height: f32,
    /// UV tiling factor written to the terrain material
    pub uv_tiling: [f32; 2],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 500,
            uv_density: 0.6,
            height: 20.0,
            uv_tiling: [100.0, 100.0],
        }
    }
}

/// Start pose of the free-flying camera
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraStartConfig {
    /// World space position
    pub position: [f32; 3],
    /// Forward vector
    pub forward: [f32; 3],
}

impl Default for CameraStartConfig {
    fn default() -> Self {
        Self {
            position: [13.614, 16.0, 32.0],
            forward: [-0.466, -0.67, -0.579],
        }
    }
}

/// Particle emitter settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Maximum live particles
    pub capacity: usize,
    /// Particles spawned per second
    pub spawn_rate: f32,
    /// Lifetime of each particle in seconds
    pub lifetime: f32,
    /// Emitter position in world space
    pub origin: [f32; 3],
    /// Initial velocity before spread is applied
    pub initial_velocity: [f32; 3],
    /// Random velocity spread per axis
    pub spread: f32,
    /// Downward acceleration
    pub gravity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            spawn_rate: 50.0,
            lifetime: 3.0,
            origin: [0.0, 5.0, 0.0],
            initial_velocity: [0.0, 4.0, 0.0],
            spread: 1.5,
            gravity: 9.8,
        }
    }
}

/// Complete configuration for the scene bootstrap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Initial surface size
    pub window: WindowConfig,
    /// Root of the asset tree, handed to the graphics system
    pub asset_root: String,
    /// Directory holding shader sources
    pub shader_root: String,
    /// Clear colour (RGBA)
    pub background_color: [f32; 4],
    /// Terrain parameters
    pub terrain: TerrainConfig,
    /// Free camera start pose
    pub camera: CameraStartConfig,
    /// Particle emitter settings
    pub particles: ParticleConfig,
    /// Whether the debug overlay starts active
    pub debug_overlay: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            asset_root: "data/assets/".to_string(),
            shader_root: "data/shaders/".to_string(),
            background_color: [1.0, 1.0, 1.0, 1.0],
            terrain: TerrainConfig::default(),
            camera: CameraStartConfig::default(),
            particles: ParticleConfig::default(),
            debug_overlay: true,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Path of a file under the asset root
    pub fn asset(&self, relative: &str) -> String {
        format!("{}{}", self.asset_root, relative)
    }

    /// Path of a file under the shader root
    pub fn shader(&self, relative: &str) -> String {
        format!("{}{}", self.shader_root, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_scene() {
        let config = GameConfig::default();

        assert_eq!(config.asset_root, "data/assets/");
        assert_eq!(config.terrain.resolution, 500);
        assert_eq!(config.terrain.height, 20.0);
        assert_eq!(config.background_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(config.asset("terrain/cliffs.tga"), "data/assets/terrain/cliffs.tga");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GameConfig = toml::from_str("asset_root = \"assets/\"\n[window]\nwidth = 800\n")
            .expect("partial config should parse");

        assert_eq!(config.asset_root, "assets/");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_ron_round_trip_through_disk() {
        let path = std::env::temp_dir().join(format!("scene_engine_config_{}.ron", std::process::id()));
        let mut config = GameConfig::default();
        config.debug_overlay = false;

        config.save_to_file(&path).expect("save should succeed");
        let loaded = GameConfig::load_from_file(&path).expect("load should succeed");
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let result = GameConfig::default().save_to_file("scene.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
