//! Path parsing errors

use thiserror::Error;

/// Errors produced while reading SVG path data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// Path data contains no drawing commands
    #[error("path data is empty")]
    Empty,

    /// The first command is not a move-to
    #[error("path data must start with a move-to command")]
    MissingMoveTo,

    /// A character that is neither a command, a number nor a separator
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    /// A command ran out of numeric arguments
    #[error("expected a number at offset {offset}")]
    ExpectedNumber { offset: usize },

    /// Arc flags must be `0` or `1`
    #[error("expected an arc flag (0 or 1) at offset {offset}")]
    InvalidFlag { offset: usize },

    /// The outline has no length to resample
    #[error("path has no drawable length")]
    Degenerate,
}

/// Result type for path operations
pub type Result<T> = std::result::Result<T, PathError>;
