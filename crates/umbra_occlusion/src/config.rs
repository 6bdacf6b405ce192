//! # Occluder Configuration
//!
//! Loaded once at startup, usually from a TOML file:
//!
//! ```toml
//! width = 1024
//! height = 768
//! levels = 2
//! camera_move_threshold = 1.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OcclusionError, OcclusionResult};
use crate::tile::diameter_for_level;

/// Deepest supported hierarchy (8, 64 and 512 pixel tiles).
pub const MAX_LEVELS: u8 = 3;

/// Largest supported raster side in pixels. Edge values are checked
/// against this at polygon construction.
pub const MAX_RASTER_SIZE: u32 = 8192;

/// Configuration for the occluder and the culling driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Raster width in pixels. Multiple of the top-level tile diameter, at
    /// most [`MAX_RASTER_SIZE`].
    pub width: u32,
    /// Raster height in pixels. Same constraints as `width`.
    pub height: u32,
    /// Number of hierarchy levels, 1 to [`MAX_LEVELS`].
    pub levels: u8,
    /// Camera travel (in blocks) that forces a new occlusion pass.
    pub camera_move_threshold: f32,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            levels: 2,
            camera_move_threshold: 1.0,
        }
    }
}

impl OcclusionConfig {
    /// Creates a validated configuration for a raster of the given size.
    ///
    /// # Errors
    ///
    /// See [`OcclusionConfig::validate`].
    pub fn new(width: u32, height: u32, levels: u8) -> OcclusionResult<Self> {
        let config = Self {
            width,
            height,
            levels,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OcclusionError::ConfigParse`] for malformed TOML and
    /// [`OcclusionError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> OcclusionResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| OcclusionError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`OcclusionError::ConfigRead`] if the file cannot be read,
    /// otherwise as [`OcclusionConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> OcclusionResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| OcclusionError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks that the raster tiles evenly at the top level.
    ///
    /// # Errors
    ///
    /// Returns [`OcclusionError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> OcclusionResult<()> {
        if self.levels == 0 || self.levels > MAX_LEVELS {
            return Err(OcclusionError::InvalidConfig(format!(
                "levels must be 1..={MAX_LEVELS}, got {}",
                self.levels
            )));
        }

        let top = self.top_diameter();
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value % top != 0 {
                return Err(OcclusionError::InvalidConfig(format!(
                    "{name} must be a positive multiple of {top}, got {value}"
                )));
            }
            if value > MAX_RASTER_SIZE {
                return Err(OcclusionError::InvalidConfig(format!(
                    "{name} must be at most {MAX_RASTER_SIZE}, got {value}"
                )));
            }
        }

        if !self.camera_move_threshold.is_finite() || self.camera_move_threshold < 0.0 {
            return Err(OcclusionError::InvalidConfig(format!(
                "camera_move_threshold must be finite and >= 0, got {}",
                self.camera_move_threshold
            )));
        }

        Ok(())
    }

    /// Diameter in pixels of the coarsest tiles.
    #[must_use]
    pub const fn top_diameter(&self) -> u32 {
        diameter_for_level(self.levels.saturating_sub(1) as usize) as u32
    }
}
