//! Solstice Theme Toggle
//!
//! An animated sun/moon button that switches between light and dark themes:
//!
//! - **Body morph**: the sun outline flows into the crescent moon and back
//! - **Decoration poses**: rays, stars and the container follow a per-element
//!   choreography, with hover poses once a transition has settled
//! - **Reveal**: a theme selection swaps the page behind a circular clip that
//!   grows from the toggle
//!
//! The [`ToggleCoordinator`] ties them together. It is driven entirely by
//! the host: feed it input, call [`ToggleCoordinator::tick`] every frame, and
//! draw [`ToggleCoordinator::frame`].
//!
//! # Example
//!
//! ```rust
//! use solstice_theme::{ColorScheme, InMemoryThemeProvider, ThemePreference};
//! use solstice_toggle::{HeadlessEnvironment, IconState, ToggleConfig, ToggleCoordinator};
//!
//! let provider = InMemoryThemeProvider::new(ThemePreference::Light, ColorScheme::Light);
//! let mut toggle = ToggleCoordinator::mount(
//!     provider,
//!     HeadlessEnvironment::default(),
//!     ToggleConfig::default(),
//! )
//! .unwrap();
//!
//! toggle.click();
//! for _ in 0..60 {
//!     toggle.tick(16.0);
//! }
//! assert_eq!(toggle.current_icon(), IconState::Sun);
//! assert!(toggle.state().animation_complete);
//! ```

pub mod config;
pub mod coordinator;
pub mod decoration;
pub mod environment;
pub mod error;
pub mod frame;
pub mod icon;
pub mod morph;
pub mod reveal;

pub use config::ToggleConfig;
pub use coordinator::{Phase, ToggleCoordinator, ToggleEvent, ToggleState, ToggleStats};
pub use decoration::{
    DecorationAnimator, DecorationTable, ElementGeometry, ElementId, GeometryPatch, PoseSettled,
    PoseTiming,
};
pub use environment::{Environment, HeadlessEnvironment, ViewTransition};
pub use error::{ConfigError, Result};
pub use frame::{render_svg, ToggleFrame};
pub use icon::{IconState, PoseKey};
pub use morph::PathMorpher;
pub use reveal::{ClipCircle, RevealGeometry, RevealTransition};
