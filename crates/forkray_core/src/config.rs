//! Render configuration.
//!
//! Produced by the command line or a JSON file, consumed by the renderer.
//! Every field has a default, so a JSON file only needs the fields it
//! changes:
//!
//! ```json
//! { "width": 320, "height": 240, "samples": 16, "seed": [0, 0, 0, 7] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Samples per pixel must be positive")]
    ZeroSamples,

    #[error("Thread count must be positive")]
    ZeroThreads,

    #[error("Run count must be positive")]
    ZeroRuns,

    #[error("Aperture must be finite and non-negative, got {0}")]
    InvalidAperture(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Shape the camera origin is jittered within for depth of field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApertureShape {
    /// Uniform over the unit disc (round bokeh).
    #[default]
    Disc,
    /// Uniform over the square [-1, 1)^2.
    Rectangle,
}

/// Everything the renderer needs besides the scene and camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel
    pub samples: u32,
    /// Deepest recursion level that is still shaded; deeper levels are black
    pub max_depth: u32,
    /// Lens radius used for depth-of-field jitter
    pub aperture: f64,
    pub aperture_shape: ApertureShape,
    /// Worker threads
    pub threads: usize,
    /// Base RNG seed, four 64-bit words
    pub seed: [u64; 4],
    /// Number of repeated, timed render passes
    pub runs: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            samples: 8,
            max_depth: 2,
            aperture: 1.0 / 128.0,
            aperture_shape: ApertureShape::Disc,
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            seed: [0, 0, 0, 1],
            runs: 1,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Check the configuration before any rendering work starts.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if !self.aperture.is_finite() || self.aperture < 0.0 {
            return Err(ConfigError::InvalidAperture(self.aperture));
        }
        Ok(())
    }

    /// Total number of pixels, or None if it does not fit in memory indices.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, [0, 0, 0, 1]);
        assert!(config.threads >= 1);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let config = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { width: 0, .. })
        ));

        let config = RenderConfig {
            height: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { height: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_counts() {
        let base = RenderConfig::default();

        let c = RenderConfig { samples: 0, ..base.clone() };
        assert!(matches!(c.validate(), Err(ConfigError::ZeroSamples)));

        let c = RenderConfig { threads: 0, ..base.clone() };
        assert!(matches!(c.validate(), Err(ConfigError::ZeroThreads)));

        let c = RenderConfig { runs: 0, ..base };
        assert!(matches!(c.validate(), Err(ConfigError::ZeroRuns)));
    }

    #[test]
    fn test_rejects_bad_aperture() {
        for aperture in [-0.1, f64::NAN, f64::INFINITY] {
            let c = RenderConfig {
                aperture,
                ..Default::default()
            };
            assert!(matches!(c.validate(), Err(ConfigError::InvalidAperture(_))));
        }

        // A pinhole is fine
        let c = RenderConfig {
            aperture: 0.0,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = RenderConfig::from_json_str(
            r#"{ "width": 32, "height": 16, "aperture_shape": "rectangle", "seed": [1, 2, 3, 4] }"#,
        )
        .unwrap();

        assert_eq!(config.width, 32);
        assert_eq!(config.height, 16);
        assert_eq!(config.aperture_shape, ApertureShape::Rectangle);
        assert_eq!(config.seed, [1, 2, 3, 4]);
        // Untouched fields keep their defaults
        assert_eq!(config.samples, 8);
        assert_eq!(config.max_depth, 2);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let err = RenderConfig::from_json_str(r#"{ "widht": 32 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = RenderConfig {
            width: 7,
            threads: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RenderConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = RenderConfig::from_json_file("/nonexistent/forkray.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_pixel_count() {
        let c = RenderConfig {
            width: 640,
            height: 480,
            ..Default::default()
        };
        assert_eq!(c.pixel_count(), Some(640 * 480));
    }
}
