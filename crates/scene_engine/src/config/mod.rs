//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::scene::FlameParams;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
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

/// Camera projection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Near clipping plane distance
    pub znear: f32,
    /// Far clipping plane distance
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            znear: 0.1,
            zfar: 256.0,
        }
    }
}

/// Actor controller tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Units per second
    pub movement_speed: f32,
    /// Degrees per unit of pointer movement
    pub rotation_speed: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            rotation_speed: 0.25,
        }
    }
}

/// Settings for the headless flame demo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Application name reported in logs
    pub application_name: String,
    /// Number of frames to render before exiting
    pub frame_count: u32,
    /// Fixed frame delta in seconds
    pub frame_delta: f32,
    /// Number of swapchain images the headless pacer cycles through
    pub swapchain_images: u32,
    /// Minimum uniform buffer offset alignment reported by the headless host
    pub min_uniform_alignment: u64,
    /// Switch to the next camera every N frames (0 disables cycling)
    pub camera_cycle_interval: u32,
    /// Primary camera projection
    pub camera: CameraConfig,
    /// Controller tuning
    pub controller: ControllerConfig,
    /// Flame emitter parameters
    pub flame: FlameParams,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            application_name: "CG Coursework".to_string(),
            frame_count: 240,
            frame_delta: 1.0 / 60.0,
            swapchain_images: 3,
            min_uniform_alignment: 256,
            camera_cycle_interval: 120,
            camera: CameraConfig::default(),
            controller: ControllerConfig::default(),
            flame: FlameParams::default(),
        }
    }
}

impl Config for DemoConfig {}
