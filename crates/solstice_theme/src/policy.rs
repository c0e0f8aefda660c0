//! Theme switch policy
//!
//! Decides how a theme selection is applied. Only selections that change
//! what is on screen earn a reveal transition.

use crate::provider::ThemeProvider;
use crate::scheme::{ColorScheme, ThemePreference};
use serde::Serialize;

/// How to apply a requested theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPlan {
    /// Nothing to do
    Ignore,
    /// Commit the preference without any visual transition
    Commit,
    /// Commit the preference inside a synchronized reveal transition
    CommitWithReveal,
}

/// Plan a switch from the current provider state to `requested`
///
/// - "system" while already on "system": ignored
/// - "system" while the fixed preference equals the OS scheme: quiet commit
/// - a fixed theme equal to the resolved scheme: quiet commit
/// - anything else changes the appearance and gets a reveal
pub fn plan_switch(
    theme: ThemePreference,
    system: ColorScheme,
    resolved: ColorScheme,
    requested: ThemePreference,
) -> SwitchPlan {
    match requested {
        ThemePreference::System => {
            if theme == ThemePreference::System {
                return SwitchPlan::Ignore;
            }
            if theme.scheme() == Some(system) {
                return SwitchPlan::Commit;
            }
        }
        fixed => {
            if fixed.scheme() == Some(resolved) {
                return SwitchPlan::Commit;
            }
        }
    }
    SwitchPlan::CommitWithReveal
}

/// [`plan_switch`] against a live provider
pub fn plan_for(provider: &dyn ThemeProvider, requested: ThemePreference) -> SwitchPlan {
    plan_switch(
        provider.theme(),
        provider.system_theme(),
        provider.resolved_theme(),
        requested,
    )
}
