//! Color schemes and user theme preferences

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The effective appearance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Get the opposite scheme
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user selected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the OS color scheme
    #[default]
    System,
}

impl ThemePreference {
    /// Resolve against the OS scheme
    pub fn resolve(self, system: ColorScheme) -> ColorScheme {
        match self {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::System => system,
        }
    }

    /// The fixed scheme this preference names, `None` for `System`
    pub fn scheme(self) -> Option<ColorScheme> {
        match self {
            ThemePreference::Light => Some(ColorScheme::Light),
            ThemePreference::Dark => Some(ColorScheme::Dark),
            ThemePreference::System => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl From<ColorScheme> for ThemePreference {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => ThemePreference::Light,
            ColorScheme::Dark => ThemePreference::Dark,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown theme name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme '{0}' (expected light, dark or system)")]
pub struct ParseThemeError(pub String);

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_resolves_to_os_scheme() {
        assert_eq!(ThemePreference::System.resolve(ColorScheme::Dark), ColorScheme::Dark);
        assert_eq!(ThemePreference::Light.resolve(ColorScheme::Dark), ColorScheme::Light);
        assert_eq!(ThemePreference::System.scheme(), None);
    }

    #[test]
    fn parse_and_display_round_trip() {
        for pref in [ThemePreference::Light, ThemePreference::Dark, ThemePreference::System] {
            assert_eq!(pref.to_string().parse::<ThemePreference>(), Ok(pref));
        }
        assert_eq!(" Dark ".parse::<ColorScheme>(), Ok(ColorScheme::Dark));
        assert!("system".parse::<ColorScheme>().is_err());
        assert_eq!(
            "sepia".parse::<ThemePreference>(),
            Err(ParseThemeError("sepia".into()))
        );
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(ColorScheme::Light.toggle(), ColorScheme::Dark);
        assert_eq!(ColorScheme::Dark.toggle().toggle(), ColorScheme::Dark);
    }
}
