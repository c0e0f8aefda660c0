//! Theme providers and change subscriptions

use crate::scheme::{ColorScheme, ThemePreference};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`ThemeProvider::subscribe`]
    pub struct SubscriptionId;
}

/// Called with the new resolved scheme whenever it changes
pub type SchemeListener = Box<dyn FnMut(ColorScheme)>;

/// Source of truth for the active theme
///
/// Implementations own persistence; consumers only read, commit and listen.
pub trait ThemeProvider {
    /// The user's preference, possibly `System`
    fn theme(&self) -> ThemePreference;

    /// The OS-level scheme
    fn system_theme(&self) -> ColorScheme;

    /// The effective scheme
    fn resolved_theme(&self) -> ColorScheme {
        self.theme().resolve(self.system_theme())
    }

    /// Commit a new preference
    fn set_theme(&mut self, theme: ThemePreference);

    /// Register a listener for resolved-scheme changes
    fn subscribe(&mut self, listener: SchemeListener) -> SubscriptionId;

    /// Remove a listener; returns false if it was already gone
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

impl<T: ThemeProvider + ?Sized> ThemeProvider for &mut T {
    fn theme(&self) -> ThemePreference {
        (**self).theme()
    }

    fn system_theme(&self) -> ColorScheme {
        (**self).system_theme()
    }

    fn resolved_theme(&self) -> ColorScheme {
        (**self).resolved_theme()
    }

    fn set_theme(&mut self, theme: ThemePreference) {
        (**self).set_theme(theme)
    }

    fn subscribe(&mut self, listener: SchemeListener) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

/// Provider that keeps everything in memory
///
/// `set_system_theme` stands in for the OS flipping its appearance.
pub struct InMemoryThemeProvider {
    theme: ThemePreference,
    system: ColorScheme,
    listeners: SlotMap<SubscriptionId, SchemeListener>,
    commits: usize,
}

impl InMemoryThemeProvider {
    pub fn new(theme: ThemePreference, system: ColorScheme) -> Self {
        Self {
            theme,
            system,
            listeners: SlotMap::with_key(),
            commits: 0,
        }
    }

    /// Change the OS scheme, notifying listeners if the resolved scheme moves
    pub fn set_system_theme(&mut self, system: ColorScheme) {
        let before = self.resolved_theme();
        self.system = system;
        tracing::debug!("theme provider: system scheme -> {}", system);
        self.notify_if_changed(before);
    }

    /// Number of `set_theme` calls so far
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify_if_changed(&mut self, before: ColorScheme) {
        let after = self.resolved_theme();
        if after == before {
            return;
        }
        tracing::debug!("theme provider: resolved scheme {} -> {}", before, after);
        for (_, listener) in self.listeners.iter_mut() {
            listener(after);
        }
    }
}

impl Default for InMemoryThemeProvider {
    fn default() -> Self {
        Self::new(ThemePreference::System, ColorScheme::Light)
    }
}

impl ThemeProvider for InMemoryThemeProvider {
    fn theme(&self) -> ThemePreference {
        self.theme
    }

    fn system_theme(&self) -> ColorScheme {
        self.system
    }

    fn set_theme(&mut self, theme: ThemePreference) {
        let before = self.resolved_theme();
        self.theme = theme;
        self.commits += 1;
        tracing::debug!("theme provider: preference -> {}", theme);
        self.notify_if_changed(before);
    }

    fn subscribe(&mut self, listener: SchemeListener) -> SubscriptionId {
        self.listeners.insert(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id).is_some()
    }
}
