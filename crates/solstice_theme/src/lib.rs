//! Solstice Theme Resolution
//!
//! Models the theme collaborator the toggle talks to:
//!
//! - **Color schemes**: the effective light/dark appearance
//! - **Preferences**: what the user picked, possibly "system"
//! - **Providers**: expose the user preference, the OS scheme and the
//!   resolved scheme, commit changes, and push resolved-scheme changes to
//!   subscribers
//! - **Switch policy**: decides whether a selection is ignored, committed
//!   quietly, or committed behind a reveal transition
//!
//! # Quick Start
//!
//! ```rust
//! use solstice_theme::{ColorScheme, InMemoryThemeProvider, ThemePreference, ThemeProvider};
//!
//! let mut provider = InMemoryThemeProvider::new(ThemePreference::System, ColorScheme::Light);
//! assert_eq!(provider.resolved_theme(), ColorScheme::Light);
//!
//! // The OS flips to dark while the user follows the system
//! provider.set_system_theme(ColorScheme::Dark);
//! assert_eq!(provider.resolved_theme(), ColorScheme::Dark);
//! ```

pub mod policy;
pub mod provider;
pub mod scheme;

pub use policy::{plan_switch, SwitchPlan};
pub use provider::{InMemoryThemeProvider, SchemeListener, SubscriptionId, ThemeProvider};
pub use scheme::{ColorScheme, ParseThemeError, ThemePreference};
