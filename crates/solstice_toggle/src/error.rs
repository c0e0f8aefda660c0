//! Toggle error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML or unknown keys
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value outside its valid range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// A glyph path could not be turned into a morphable outline
    #[error("Invalid {glyph} glyph path: {source}")]
    InvalidGlyph {
        glyph: &'static str,
        #[source]
        source: solstice_path::PathError,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
