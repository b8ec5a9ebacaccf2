//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector in world units per second squared
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],
    /// Fixed simulation timestep in seconds
    #[serde(default = "default_timestep")]
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            timestep: default_timestep(),
        }
    }
}

fn default_gravity() -> [f32; 3] {
    [0.0, -40.0, 0.0]
}

fn default_timestep() -> f32 {
    1.0 / 60.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Keyring model path, relative to the assets directory
    #[serde(default = "default_model")]
    pub model: String,
    /// Band ribbon width in world units
    #[serde(default = "default_band_width")]
    pub band_width: f32,
    /// Start with the collider overlay enabled
    #[serde(default)]
    pub debug: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            band_width: default_band_width(),
            debug: false,
        }
    }
}

fn default_model() -> String {
    "keyring.glb".to_string()
}

fn default_band_width() -> f32 {
    0.05
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera world position
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov_degrees: default_fov(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 13.0]
}

fn default_fov() -> f32 {
    25.0
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(config)
}
