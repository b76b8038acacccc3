//! Tunable constants for the petal animation.
//!
//! Every value has a default matching the classic falling-petal look, so
//! `SakuraConfig::default()` needs no tweaking. A config can also be loaded
//! from a RON file; fields that are left out keep their defaults:
//!
//! ```ron
//! (
//!     petal_count: 60,
//!     wind: (amplitude: 0.04),
//!     sprite: Some("assets/sakura.png"),
//! )
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sprite::FilterMode;

/// Inclusive clamp applied to a petal speed component every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimit {
    pub min: f32,
    pub max: f32,
}

impl SpeedLimit {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into `[min, max]`.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

/// Global wind oscillation.
///
/// `wind(t) = sin(t_ms * frequency) * amplitude`, and the vertical speed
/// receives `wind * vertical_coupling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub frequency: f64,
    pub amplitude: f32,
    pub vertical_coupling: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            frequency: 0.0005,
            amplitude: 0.02,
            vertical_coupling: 0.3,
        }
    }
}

/// Extra per-frame displacement per unit of pointer bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerPush {
    pub x: f32,
    pub y: f32,
}

impl Default for PointerPush {
    fn default() -> Self {
        Self { x: 3.0, y: 1.0 }
    }
}

/// Native window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear colour (linear RGBA).
    pub background: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sakura".to_string(),
            width: 1280,
            height: 720,
            background: [0.97, 0.94, 0.95, 1.0],
        }
    }
}

/// Full configuration of the engine and its host window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SakuraConfig {
    /// Size of the petal pool.
    pub petal_count: usize,
    /// Sprite width in pixels, drawn on every reset.
    pub width: Range<f32>,
    /// Sprite height in pixels, drawn on every reset.
    pub height: Range<f32>,
    /// `opacity = width / opacity_divisor`.
    pub opacity_divisor: f32,
    /// Initial rotation in radians.
    pub rotation: Range<f32>,
    /// Rotation added per frame, in radians.
    pub rotate_speed: Range<f32>,
    /// Initial horizontal speed (negative drifts left).
    pub x_speed: Range<f32>,
    /// Initial vertical speed (positive falls).
    pub y_speed: Range<f32>,
    pub x_speed_limit: SpeedLimit,
    pub y_speed_limit: SpeedLimit,
    /// Per-petal wind bias, drawn once when the petal is created.
    pub wind_force: Range<f32>,
    /// Per-petal speed decay factor, drawn once when the petal is created.
    pub speed_variation: Range<f32>,
    pub wind: WindConfig,
    pub pointer_push: PointerPush,
    /// Sprite image. `None` uses the built-in procedural petal.
    pub sprite: Option<PathBuf>,
    /// How the sprite texture is sampled when scaled.
    pub sprite_filter: FilterMode,
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub window: WindowConfig,
}

impl Default for SakuraConfig {
    fn default() -> Self {
        Self {
            petal_count: 30,
            width: 15.0..25.0,
            height: 12.0..20.0,
            opacity_divisor: 50.0,
            rotation: 0.0..1.0,
            rotate_speed: 0.0..0.03,
            x_speed: -3.0..-1.0,
            y_speed: 1.0..1.8,
            x_speed_limit: SpeedLimit::new(-3.0, -0.5),
            y_speed_limit: SpeedLimit::new(0.3, 1.8),
            wind_force: -0.01..0.01,
            speed_variation: 0.95..1.05,
            wind: WindConfig::default(),
            pointer_push: PointerPush::default(),
            sprite: Some(PathBuf::from("assets/sakura.png")),
            sprite_filter: FilterMode::Linear,
            seed: None,
            window: WindowConfig::default(),
        }
    }
}

impl SakuraConfig {
    /// Parse a config from RON text and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: SakuraConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Set the number of petals.
    pub fn with_petal_count(mut self, count: usize) -> Self {
        self.petal_count = count;
        self
    }

    /// Set the sprite image path.
    pub fn with_sprite<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.sprite = Some(path.into());
        self
    }

    /// Use the built-in procedural petal instead of an image file.
    pub fn with_builtin_sprite(mut self) -> Self {
        self.sprite = None;
        self
    }

    /// Set how the sprite is sampled.
    pub fn with_sprite_filter(mut self, filter: FilterMode) -> Self {
        self.sprite_filter = filter;
        self
    }

    /// Seed the random number generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every range can be sampled, every limit is ordered and
    /// every scalar is finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.petal_count == 0 {
            return Err(ConfigError::Invalid {
                field: "petal_count",
                reason: "must be at least 1",
            });
        }

        let ranges = [
            ("width", &self.width),
            ("height", &self.height),
            ("rotation", &self.rotation),
            ("rotate_speed", &self.rotate_speed),
            ("x_speed", &self.x_speed),
            ("y_speed", &self.y_speed),
            ("wind_force", &self.wind_force),
            ("speed_variation", &self.speed_variation),
        ];
        for (field, range) in ranges {
            // `!(a < b)` also rejects NaN bounds
            if !(range.start < range.end) {
                return Err(ConfigError::EmptyRange {
                    field,
                    start: range.start,
                    end: range.end,
                });
            }
            // The sampler scales by `end - start`, which must not overflow
            if !(range.end - range.start).is_finite() {
                return Err(ConfigError::UnboundedRange {
                    field,
                    start: range.start,
                    end: range.end,
                });
            }
        }

        for (field, limit) in [
            ("x_speed_limit", &self.x_speed_limit),
            ("y_speed_limit", &self.y_speed_limit),
        ] {
            if !(limit.min <= limit.max) {
                return Err(ConfigError::InvertedLimit {
                    field,
                    min: limit.min,
                    max: limit.max,
                });
            }
            if !limit.min.is_finite() || !limit.max.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "limits must be finite",
                });
            }
        }

        if !(self.opacity_divisor > 0.0 && self.opacity_divisor.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "opacity_divisor",
                reason: "must be positive and finite",
            });
        }
        if !self.wind.frequency.is_finite()
            || !self.wind.amplitude.is_finite()
            || !self.wind.vertical_coupling.is_finite()
        {
            return Err(ConfigError::Invalid {
                field: "wind",
                reason: "frequency, amplitude and vertical_coupling must be finite",
            });
        }
        if !self.pointer_push.x.is_finite() || !self.pointer_push.y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "pointer_push",
                reason: "must be finite",
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: "width and height must be at least 1",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_constants() {
        let config = SakuraConfig::default();
        assert_eq!(config.petal_count, 30);
        assert_eq!(config.width, 15.0..25.0);
        assert_eq!(config.height, 12.0..20.0);
        assert_eq!(config.x_speed_limit, SpeedLimit::new(-3.0, -0.5));
        assert_eq!(config.y_speed_limit, SpeedLimit::new(0.3, 1.8));
        assert_eq!(config.wind.frequency, 0.0005);
        assert_eq!(config.wind.amplitude, 0.02);
        assert_eq!(config.pointer_push, PointerPush { x: 3.0, y: 1.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_limit_apply() {
        let limit = SpeedLimit::new(-3.0, -0.5);
        assert_eq!(limit.apply(-10.0), -3.0);
        assert_eq!(limit.apply(0.2), -0.5);
        assert_eq!(limit.apply(-1.25), -1.25);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = SakuraConfig::from_ron_str(
            r#"(
                petal_count: 60,
                wind: (amplitude: 0.04),
                seed: Some(7),
            )"#,
        )
        .unwrap();

        assert_eq!(config.petal_count, 60);
        assert_eq!(config.wind.amplitude, 0.04);
        assert_eq!(config.wind.frequency, 0.0005);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.width, 15.0..25.0);
    }

    #[test]
    fn test_ron_ranges() {
        let config =
            SakuraConfig::from_ron_str("(width: (start: 5.0, end: 6.0))").unwrap();
        assert_eq!(config.width, 5.0..6.0);
    }

    #[test]
    fn test_sprite_filter_from_ron() {
        let config = SakuraConfig::from_ron_str("(sprite_filter: Nearest)").unwrap();
        assert_eq!(config.sprite_filter, FilterMode::Nearest);
        assert_eq!(SakuraConfig::default().sprite_filter, FilterMode::Linear);
    }

    #[test]
    fn test_rejects_empty_range() {
        let config = SakuraConfig {
            y_speed: 1.8..1.0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::EmptyRange { field, .. }) => assert_eq!(field, "y_speed"),
            other => panic!("expected EmptyRange, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_inverted_limit_and_zero_count() {
        let config = SakuraConfig {
            y_speed_limit: SpeedLimit::new(1.8, 0.3),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedLimit { field: "y_speed_limit", .. })
        ));

        let config = SakuraConfig::default().with_petal_count(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "petal_count", .. })
        ));
    }

    #[test]
    fn test_rejects_unbounded_ranges() {
        let err = SakuraConfig::from_ron_str("(width: (start: 15.0, end: inf))").unwrap_err();
        assert!(matches!(err, ConfigError::UnboundedRange { field: "width", .. }));

        // Both bounds finite, but the span overflows f32
        let err = SakuraConfig::from_ron_str("(rotation: (start: -3.0e38, end: 3.0e38))")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnboundedRange { field: "rotation", .. }));

        let config = SakuraConfig {
            x_speed: f32::NEG_INFINITY..-1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnboundedRange { field: "x_speed", .. })
        ));

        let config = SakuraConfig {
            height: f32::NAN..20.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange { field: "height", .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_scalars() {
        let mut config = SakuraConfig::default();
        config.pointer_push.x = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "pointer_push", .. })
        ));

        let mut config = SakuraConfig::default();
        config.pointer_push.y = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "pointer_push", .. })
        ));

        let mut config = SakuraConfig::default();
        config.wind.vertical_coupling = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "wind", .. })
        ));

        let config = SakuraConfig {
            opacity_divisor: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "opacity_divisor", .. })
        ));

        let config = SakuraConfig {
            x_speed_limit: SpeedLimit::new(f32::NEG_INFINITY, -0.5),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "x_speed_limit", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_window_size() {
        let err = SakuraConfig::from_ron_str("(window: (width: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "window", .. }));

        let mut config = SakuraConfig::default();
        config.window.height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "window", .. })
        ));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let err = SakuraConfig::from_ron_str("(petal_count: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SakuraConfig::from_file("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
