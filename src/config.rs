//! Surface setup configuration, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SurfaceError};

/// Dimensions and presentation settings for the simulation surface.
/// Dimensions are fixed once the first GPU upload happens; the staging
/// texture is never resized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
}

fn default_vsync() -> bool {
    true
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            vsync: true,
        }
    }
}

impl SurfaceConfig {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| SurfaceError::Config(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| SurfaceError::Config(e.to_string()))
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| SurfaceError::Config(e.to_string()))?;
        fs::write(path, json).map_err(|e| SurfaceError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let config = SurfaceConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert!(config.vsync);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SurfaceConfig {
            width: 1920,
            height: 1080,
            vsync: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SurfaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_vsync_defaults_on_when_missing() {
        let config: SurfaceConfig = serde_json::from_str(r#"{"width":800,"height":600}"#).unwrap();
        assert!(config.vsync);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("simsurface_config_test.json");
        let config = SurfaceConfig {
            width: 320,
            height: 240,
            vsync: true,
        };
        config.save(&path).unwrap();
        let back = SurfaceConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(back, config);
    }
}
