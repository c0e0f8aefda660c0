//! Icon states, pose keys and the built-in glyphs

use serde::{Deserialize, Serialize};
use solstice_theme::ColorScheme;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side length of the square icon viewBox
pub const VIEW_BOX: f32 = 22.0;

/// Sun body, a circle of radius 4 around the icon center
pub const SUN_PATH: &str = "M11.01,7.01c1.05,0,2,.4,2.71,1.06.79.73,1.28,1.77,1.28,2.93,0,2.21-1.79,4-4,4s-4-1.79-4-4,1.8-3.99,4.01-3.99Z";

/// Crescent moon body
pub const MOON_PATH: &str =
    "M10,1c-2.49,2.49-2.49,6.51,0,9,2.49,2.49,6.51,2.49,9,0,0,4.97-4.03,9-9,9S1,14.97,1,10,5.03,1,10,1";

/// Sun rays, clockwise from twelve o'clock
pub const RAY_PATHS: [&str; 8] = [
    "M11,3V1",
    "M16.66,5.34l1.41-1.41",
    "M19,11h2",
    "M16.66,16.66l1.41,1.41",
    "M11,19v2",
    "M5.34,16.66l-1.41,1.41",
    "M3,11H1",
    "M5.34,5.34l-1.41-1.41",
];

/// The two strokes of the sparkle next to the moon
pub const STAR_PATHS: [&str; 2] = ["M18,1v4", "M20,3h-4"];

/// Which glyph the icon shows
///
/// The icon shows the glyph of the theme a click would switch to, so a dark
/// page displays the sun.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconState {
    #[default]
    Sun = 0,
    Moon = 1,
}

impl IconState {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(IconState::Sun),
            1 => Some(IconState::Moon),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            IconState::Sun => IconState::Moon,
            IconState::Moon => IconState::Sun,
        }
    }

    /// Icon for a resolved scheme
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Dark => IconState::Sun,
            ColorScheme::Light => IconState::Moon,
        }
    }

    /// Morph progress at which this glyph is fully drawn
    pub fn progress(self) -> f32 {
        self.index() as f32
    }
}

/// Named decoration pose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoseKey {
    Sun,
    SunHover,
    Moon,
    MoonHover,
}

impl PoseKey {
    pub const ALL: [PoseKey; 4] = [
        PoseKey::Sun,
        PoseKey::SunHover,
        PoseKey::Moon,
        PoseKey::MoonHover,
    ];

    pub fn rest(icon: IconState) -> Self {
        match icon {
            IconState::Sun => PoseKey::Sun,
            IconState::Moon => PoseKey::Moon,
        }
    }

    pub fn hover(icon: IconState) -> Self {
        match icon {
            IconState::Sun => PoseKey::SunHover,
            IconState::Moon => PoseKey::MoonHover,
        }
    }

    pub fn icon(self) -> IconState {
        match self {
            PoseKey::Sun | PoseKey::SunHover => IconState::Sun,
            PoseKey::Moon | PoseKey::MoonHover => IconState::Moon,
        }
    }

    pub fn is_hover(self) -> bool {
        matches!(self, PoseKey::SunHover | PoseKey::MoonHover)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PoseKey::Sun => "sun",
            PoseKey::SunHover => "sun-hover",
            PoseKey::Moon => "moon",
            PoseKey::MoonHover => "moon-hover",
        }
    }
}

impl fmt::Display for PoseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown pose name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown pose '{0}' (expected sun, sun-hover, moon or moon-hover)")]
pub struct ParsePoseError(pub String);

impl FromStr for PoseKey {
    type Err = ParsePoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        PoseKey::ALL
            .into_iter()
            .find(|pose| pose.as_str() == name)
            .ok_or_else(|| ParsePoseError(s.to_string()))
    }
}
