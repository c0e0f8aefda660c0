//! Toggle configuration (solstice.toml)
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! [morph]
//! duration_ms = 400
//! easing = "ease-in-out"
//!
//! [reveal]
//! duration_ms = 800
//! easing = { cubic-bezier = [0.4, 0.0, 0.2, 1.0] }
//!
//! [decoration]
//! ray_stagger_ms = 60
//!
//! [path]
//! max_segment_length = 1.0
//! ```

use crate::error::{ConfigError, Result};
use crate::icon::{MOON_PATH, SUN_PATH};
use serde::{Deserialize, Serialize};
use solstice_animation::{Easing, TweenOptions};
use std::fs;
use std::path::Path;

/// Top-level toggle configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleConfig {
    #[serde(default)]
    pub morph: MorphConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub decoration: DecorationConfig,
    #[serde(default)]
    pub path: PathConfig,
}

/// Glyph morph timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MorphConfig {
    #[serde(default = "default_morph_duration")]
    pub duration_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: Easing,
}

fn default_morph_duration() -> u32 {
    400
}

fn default_easing() -> Easing {
    Easing::EaseInOut
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_morph_duration(),
            easing: default_easing(),
        }
    }
}

/// Circular reveal timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RevealConfig {
    #[serde(default = "default_reveal_duration")]
    pub duration_ms: u32,
    #[serde(default = "default_easing")]
    pub easing: Easing,
}

fn default_reveal_duration() -> u32 {
    800
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_reveal_duration(),
            easing: default_easing(),
        }
    }
}

/// Decoration choreography
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecorationConfig {
    /// Per-ray delay step when the rays come back after the moon
    #[serde(default = "default_ray_stagger")]
    pub ray_stagger_ms: u32,
}

fn default_ray_stagger() -> u32 {
    60
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            ray_stagger_ms: default_ray_stagger(),
        }
    }
}

/// Glyph outlines and resampling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: f32,
    #[serde(default = "default_sun")]
    pub sun: String,
    #[serde(default = "default_moon")]
    pub moon: String,
}

fn default_max_segment_length() -> f32 {
    solstice_path::interpolate::DEFAULT_MAX_SEGMENT_LENGTH
}

fn default_sun() -> String {
    SUN_PATH.to_string()
}

fn default_moon() -> String {
    MOON_PATH.to_string()
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_segment_length: default_max_segment_length(),
            sun: default_sun(),
            moon: default_moon(),
        }
    }
}

impl ToggleConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ToggleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check ranges and glyph outlines
    pub fn validate(&self) -> Result<()> {
        let segment = self.path.max_segment_length;
        if !segment.is_finite() || segment <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "path.max_segment_length",
                reason: format!("must be a positive number, got {segment}"),
            });
        }
        for (field, easing) in [
            ("morph.easing", &self.morph.easing),
            ("reveal.easing", &self.reveal.easing),
        ] {
            if let Easing::CubicBezier(x1, _, x2, _) = easing {
                if !(0.0..=1.0).contains(x1) || !(0.0..=1.0).contains(x2) {
                    return Err(ConfigError::InvalidValue {
                        field,
                        reason: "cubic-bezier x coordinates must lie in [0, 1]".to_string(),
                    });
                }
            }
        }
        solstice_path::parse_path(&self.path.sun)
            .map_err(|source| ConfigError::InvalidGlyph { glyph: "sun", source })?;
        solstice_path::parse_path(&self.path.moon)
            .map_err(|source| ConfigError::InvalidGlyph { glyph: "moon", source })?;
        Ok(())
    }

    pub fn morph_options(&self) -> TweenOptions {
        TweenOptions::new(self.morph.duration_ms).ease(self.morph.easing)
    }

    pub fn reveal_options(&self) -> TweenOptions {
        TweenOptions::new(self.reveal.duration_ms).ease(self.reveal.easing)
    }
}
