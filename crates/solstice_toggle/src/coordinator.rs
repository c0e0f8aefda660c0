//! Toggle coordination
//!
//! The [`ToggleCoordinator`] owns the scheduler and the three animated
//! processes (body morph, decoration poses and the reveal), and maps user
//! input and theme notifications onto them. Everything runs on the caller's
//! thread and advances in [`ToggleCoordinator::tick`].
//!
//! Phases:
//!
//! ```text
//!   Idle --click--> Transitioning --click--> Transitioning
//!     ^                   |
//!     +--decoration-------+
//!        settled
//!   any --external sync--> Idle
//! ```

use crate::config::ToggleConfig;
use crate::decoration::{DecorationAnimator, DecorationTable, PoseSettled};
use crate::environment::{Environment, ViewTransition};
use crate::error::{ConfigError, Result};
use crate::frame::ToggleFrame;
use crate::icon::{IconState, PoseKey};
use crate::morph::PathMorpher;
use crate::reveal::{RevealGeometry, RevealTransition};
use serde::Serialize;
use solstice_animation::AnimationScheduler;
use solstice_core::StateMachine;
use solstice_theme::policy::plan_for;
use solstice_theme::{ColorScheme, SubscriptionId, SwitchPlan, ThemePreference, ThemeProvider};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Coordination phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Decorations have settled; hover poses are allowed
    Idle,
    /// A click is still playing out
    Transitioning,
}

/// Events driving the phase machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleEvent {
    Click,
    DecorationSettled,
    ExternalSync,
}

/// Observable toggle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    pub current_index: IconState,
    pub animation_complete: bool,
}

/// Counters for what the coordinator has done since mount
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ToggleStats {
    pub clicks: usize,
    pub hover_plays: usize,
    pub ignored_selections: usize,
    pub quiet_commits: usize,
    pub reveals_requested: usize,
    pub reveals_skipped: usize,
    pub reveals_started: usize,
    pub reveals_aborted: usize,
    pub reveals_finished: usize,
    pub external_syncs: usize,
}

type SchemeInbox = Rc<RefCell<VecDeque<ColorScheme>>>;

/// Drives the theme toggle
pub struct ToggleCoordinator<P: ThemeProvider, E: Environment> {
    provider: P,
    environment: E,
    config: ToggleConfig,
    scheduler: AnimationScheduler,
    phase: StateMachine<Phase, ToggleEvent>,
    current: IconState,
    morph: PathMorpher,
    decoration: DecorationAnimator,
    reveal: RevealTransition,
    inbox: SchemeInbox,
    subscription: Option<SubscriptionId>,
    /// Latest external change seen while transitioning
    deferred: Option<IconState>,
    pending_swap: Option<ViewTransition>,
    reveal_done: Option<oneshot::Receiver<()>>,
    hovered: bool,
    mounted: bool,
    stats: ToggleStats,
}

fn phase_machine() -> StateMachine<Phase, ToggleEvent> {
    StateMachine::builder(Phase::Idle)
        .on(Phase::Idle, ToggleEvent::Click, Phase::Transitioning)
        .on(Phase::Transitioning, ToggleEvent::Click, Phase::Transitioning)
        .on(Phase::Transitioning, ToggleEvent::DecorationSettled, Phase::Idle)
        .on_any(ToggleEvent::ExternalSync, Phase::Idle)
        .build()
}

impl<P: ThemeProvider, E: Environment> ToggleCoordinator<P, E> {
    /// Mount the toggle, showing the glyph for the provider's resolved theme
    pub fn mount(mut provider: P, environment: E, config: ToggleConfig) -> Result<Self> {
        config.validate()?;

        let current = IconState::for_scheme(provider.resolved_theme());
        let morph = PathMorpher::new(
            &config.path.sun,
            &config.path.moon,
            config.path.max_segment_length,
            config.morph_options(),
            current,
        )
        .map_err(|source| ConfigError::InvalidGlyph {
            glyph: "body",
            source,
        })?;
        let decoration = DecorationAnimator::new(
            DecorationTable::with_ray_stagger(config.decoration.ray_stagger_ms),
            PoseKey::rest(current),
        );
        let reveal = RevealTransition::new(config.reveal_options());

        let inbox: SchemeInbox = Rc::new(RefCell::new(VecDeque::new()));
        let sink = inbox.clone();
        let subscription = provider.subscribe(Box::new(move |scheme| {
            sink.borrow_mut().push_back(scheme);
        }));

        tracing::debug!(
            "toggle: mounted showing {:?} (theme {}, resolved {})",
            current,
            provider.theme(),
            provider.resolved_theme()
        );

        Ok(Self {
            provider,
            environment,
            config,
            scheduler: AnimationScheduler::new(),
            phase: phase_machine(),
            current,
            morph,
            decoration,
            reveal,
            inbox,
            subscription: Some(subscription),
            deferred: None,
            pending_swap: None,
            reveal_done: None,
            hovered: false,
            mounted: true,
            stats: ToggleStats::default(),
        })
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Flip the icon; always accepted, even mid-transition
    pub fn click(&mut self) {
        if !self.mounted {
            return;
        }
        let next = self.current.toggled();
        self.current = next;
        // A click outranks any external change that arrived before it
        self.deferred = None;
        self.stats.clicks += 1;
        self.phase.send(ToggleEvent::Click);
        self.decoration.play(&mut self.scheduler, PoseKey::rest(next));
        self.morph.animate_to(&mut self.scheduler, next);
        tracing::debug!("toggle: click -> {:?}", next);
    }

    pub fn hover_enter(&mut self) {
        if !self.mounted {
            return;
        }
        self.hovered = true;
        self.play_if_complete(PoseKey::hover(self.current));
    }

    pub fn hover_leave(&mut self) {
        if !self.mounted {
            return;
        }
        self.hovered = false;
        self.play_if_complete(PoseKey::rest(self.current));
    }

    fn play_if_complete(&mut self, pose: PoseKey) {
        if !self.is_complete() {
            tracing::trace!("toggle: {} ignored while transitioning", pose);
            return;
        }
        self.stats.hover_plays += 1;
        self.decoration.play(&mut self.scheduler, pose);
    }

    /// Apply a theme selection
    ///
    /// Returns how the selection was applied. Reveals degrade to a quiet
    /// commit when the environment cannot or should not show one.
    pub fn select_theme(&mut self, requested: ThemePreference) -> SwitchPlan {
        if !self.mounted {
            return SwitchPlan::Ignore;
        }

        match plan_for(&self.provider, requested) {
            SwitchPlan::Ignore => {
                tracing::debug!("toggle: {} already selected", requested);
                self.stats.ignored_selections += 1;
                return SwitchPlan::Ignore;
            }
            SwitchPlan::Commit => {
                self.provider.set_theme(requested);
                self.stats.quiet_commits += 1;
                return SwitchPlan::Commit;
            }
            SwitchPlan::CommitWithReveal => {}
        }

        if let Some(reason) = self.reveal_blocker() {
            tracing::debug!("toggle: reveal skipped ({}), committing {}", reason, requested);
            self.provider.set_theme(requested);
            self.stats.reveals_skipped += 1;
            return SwitchPlan::Commit;
        }

        self.reveal.begin();
        let provider = &mut self.provider;
        let transition = self
            .environment
            .start_view_transition(&mut || provider.set_theme(requested));
        self.pending_swap = Some(transition);
        self.stats.reveals_requested += 1;
        tracing::debug!("toggle: swapping to {} behind a view transition", requested);
        SwitchPlan::CommitWithReveal
    }

    fn reveal_blocker(&self) -> Option<&'static str> {
        if self.reveal.is_active() {
            Some("a reveal is already running")
        } else if !self.environment.supports_view_transitions() {
            Some("view transitions unsupported")
        } else if self.environment.control_bounds().is_none() {
            Some("control has no bounds")
        } else if self.environment.prefers_reduced_motion() {
            Some("reduced motion preferred")
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// Advance every animation by `dt_ms` and process what happened
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.mounted {
            return;
        }
        self.scheduler.advance(dt_ms);

        if let Some(settled) = self.decoration.drain() {
            self.on_decoration_settled(settled);
        }

        let notices: Vec<ColorScheme> = self.inbox.borrow_mut().drain(..).collect();
        for scheme in notices {
            self.on_scheme_changed(scheme);
        }

        self.poll_swap();
        self.poll_reveal();
    }

    fn on_decoration_settled(&mut self, settled: PoseSettled) {
        if !self.phase.is_in(Phase::Transitioning) || settled.pose != PoseKey::rest(self.current) {
            return;
        }
        self.phase.send(ToggleEvent::DecorationSettled);
        tracing::debug!("toggle: settled on {:?}", self.current);

        if let Some(target) = self.deferred.take() {
            if target != self.current {
                self.sync_to(target);
            }
        }
    }

    fn on_scheme_changed(&mut self, scheme: ColorScheme) {
        let target = IconState::for_scheme(scheme);
        if self.phase.is_in(Phase::Transitioning) {
            tracing::debug!("toggle: deferring external {} until settled", scheme);
            self.deferred = Some(target);
            return;
        }
        if target != self.current {
            self.sync_to(target);
        }
    }

    /// Jump straight to the icon for an externally changed theme
    fn sync_to(&mut self, target: IconState) {
        self.current = target;
        self.morph.jump_to(&mut self.scheduler, target);
        self.decoration.snap(&mut self.scheduler, PoseKey::rest(target));
        self.phase.send(ToggleEvent::ExternalSync);
        self.stats.external_syncs += 1;
        tracing::debug!("toggle: synced to {:?}", target);
    }

    fn poll_swap(&mut self) {
        let Some(mut transition) = self.pending_swap.take() else {
            return;
        };
        match transition.ready.try_recv() {
            Ok(()) => self.start_reveal(),
            Err(TryRecvError::Empty) => self.pending_swap = Some(transition),
            Err(TryRecvError::Closed) => {
                tracing::warn!("toggle: view transition abandoned before ready; theme stays committed");
                self.reveal.abort(&mut self.scheduler);
                self.stats.reveals_aborted += 1;
            }
        }
    }

    fn start_reveal(&mut self) {
        let Some(bounds) = self.environment.control_bounds() else {
            tracing::debug!("toggle: control lost its bounds before the reveal");
            self.reveal.abort(&mut self.scheduler);
            self.stats.reveals_aborted += 1;
            return;
        };
        let geometry = RevealGeometry::compute(bounds, self.environment.viewport());
        self.reveal_done = Some(self.reveal.play(&mut self.scheduler, geometry));
        self.stats.reveals_started += 1;
    }

    fn poll_reveal(&mut self) {
        let Some(mut done) = self.reveal_done.take() else {
            return;
        };
        match done.try_recv() {
            Ok(()) => {
                self.stats.reveals_finished += 1;
                tracing::debug!("toggle: reveal finished");
            }
            Err(TryRecvError::Empty) => self.reveal_done = Some(done),
            Err(TryRecvError::Closed) => {}
        }
    }

    /// Stop everything and detach from the provider
    ///
    /// Further input and ticks are ignored. Also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.reveal.abort(&mut self.scheduler);
        self.scheduler.clear();
        if let Some(id) = self.subscription.take() {
            self.provider.unsubscribe(id);
        }
        self.pending_swap = None;
        self.reveal_done = None;
        self.deferred = None;
        self.inbox.borrow_mut().clear();
        tracing::debug!("toggle: unmounted");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> ToggleState {
        ToggleState {
            current_index: self.current,
            animation_complete: self.is_complete(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.current_state()
    }

    /// Phase transitions so far, oldest first
    pub fn phase_history(&self) -> &[(Phase, ToggleEvent, Phase)] {
        self.phase.history()
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_in(Phase::Idle)
    }

    pub fn current_icon(&self) -> IconState {
        self.current
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether any animation is still running
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations() || self.pending_swap.is_some()
    }

    pub fn deferred_sync(&self) -> Option<IconState> {
        self.deferred
    }

    pub fn stats(&self) -> ToggleStats {
        self.stats
    }

    pub fn config(&self) -> &ToggleConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable provider access; changes are picked up on the next tick
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn morph(&self) -> &PathMorpher {
        &self.morph
    }

    pub fn decoration(&self) -> &DecorationAnimator {
        &self.decoration
    }

    pub fn reveal(&self) -> &RevealTransition {
        &self.reveal
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> ToggleFrame {
        ToggleFrame {
            icon: self.current,
            animation_complete: self.is_complete(),
            pose: self.decoration.pose(),
            progress: self.morph.progress(),
            body_path: self.morph.path(),
            elements: self.decoration.geometries(),
            clip: self.reveal.clip(),
        }
    }
}

impl<P: ThemeProvider, E: Environment> Drop for ToggleCoordinator<P, E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
