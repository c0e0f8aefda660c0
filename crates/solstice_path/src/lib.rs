//! Solstice Path Morphing
//!
//! Interpolates between two vector outlines whose path commands do not line
//! up. Both outlines are flattened with `lyon`, resampled into closed rings
//! with bounded segment length, equalized to the same number of points and
//! rotated into best alignment, so the in-between shapes stay free of
//! degenerate or self-crossing geometry.
//!
//! ```rust
//! use solstice_path::PathInterpolator;
//!
//! let square = "M0,0H10V10H0Z";
//! let diamond = "M5,0L10,5L5,10L0,5Z";
//! let morph = PathInterpolator::new(square, diamond, 1.0).unwrap();
//!
//! assert_eq!(morph.at(0.0), square);
//! assert_eq!(morph.at(1.0), diamond);
//! assert!(morph.at(0.5).starts_with('M'));
//! ```

pub mod error;
pub mod interpolate;
pub mod parse;
pub mod ring;

pub use error::{PathError, Result};
pub use interpolate::PathInterpolator;
pub use parse::parse_path;
pub use ring::Ring;
