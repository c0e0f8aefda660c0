//! Host environment access
//!
//! Everything the toggle needs from the page it lives on: measurements,
//! user motion preferences, and synchronized view transitions.

use solstice_core::{Rect, Size};
use tokio::sync::oneshot;

/// Handles for a synchronized swap started by the host
///
/// `ready` resolves once the swap has been committed and the old state
/// snapshotted; `finished` once the host has finished presenting it. A
/// closed channel means the host abandoned the transition.
#[derive(Debug)]
pub struct ViewTransition {
    pub ready: oneshot::Receiver<()>,
    pub finished: oneshot::Receiver<()>,
}

/// The page around the toggle
pub trait Environment {
    /// Viewport size in pixels
    fn viewport(&self) -> Size;

    /// Toggle bounds in viewport pixels, `None` when not laid out
    fn control_bounds(&self) -> Option<Rect>;

    fn prefers_reduced_motion(&self) -> bool;

    /// Whether synchronized swap-then-snapshot transitions are available
    fn supports_view_transitions(&self) -> bool;

    /// Run `update` as the swap of a new view transition
    fn start_view_transition(&mut self, update: &mut dyn FnMut()) -> ViewTransition;
}

struct PendingTransition {
    ready: oneshot::Sender<()>,
    finished: oneshot::Sender<()>,
}

/// Deterministic environment for tests and the CLI
///
/// With automatic readiness every transition is ready as soon as it starts;
/// otherwise call [`HeadlessEnvironment::resolve_ready`] or
/// [`HeadlessEnvironment::abort_pending`].
pub struct HeadlessEnvironment {
    viewport: Size,
    bounds: Option<Rect>,
    reduced_motion: bool,
    view_transitions: bool,
    auto_ready: bool,
    pending: Vec<PendingTransition>,
    presenting: Vec<oneshot::Sender<()>>,
    started: usize,
}

impl HeadlessEnvironment {
    pub fn new(viewport: Size, bounds: Option<Rect>) -> Self {
        Self {
            viewport,
            bounds,
            reduced_motion: false,
            view_transitions: true,
            auto_ready: true,
            pending: Vec::new(),
            presenting: Vec::new(),
            started: 0,
        }
    }

    /// Builder: declare a reduced-motion preference
    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Builder: toggle view transition support
    pub fn with_view_transitions(mut self, supported: bool) -> Self {
        self.view_transitions = supported;
        self
    }

    /// Builder: keep transitions pending until resolved by hand
    pub fn manual_ready(mut self) -> Self {
        self.auto_ready = false;
        self
    }

    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Number of transitions started
    pub fn transitions_started(&self) -> usize {
        self.started
    }

    /// Number of transitions waiting for readiness
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Mark every pending transition ready; returns how many were resolved
    pub fn resolve_ready(&mut self) -> usize {
        let count = self.pending.len();
        for pending in self.pending.drain(..) {
            let _ = pending.ready.send(());
            self.presenting.push(pending.finished);
        }
        count
    }

    /// Drop every pending transition, closing its channels
    pub fn abort_pending(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Resolve `finished` for every transition that became ready
    pub fn finish_presenting(&mut self) -> usize {
        let count = self.presenting.len();
        for finished in self.presenting.drain(..) {
            let _ = finished.send(());
        }
        count
    }
}

impl Default for HeadlessEnvironment {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0), Some(Rect::new(100.0, 50.0, 40.0, 40.0)))
    }
}

impl Environment for HeadlessEnvironment {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn control_bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn supports_view_transitions(&self) -> bool {
        self.view_transitions
    }

    fn start_view_transition(&mut self, update: &mut dyn FnMut()) -> ViewTransition {
        update();
        self.started += 1;

        let (ready_tx, ready) = oneshot::channel();
        let (finished_tx, finished) = oneshot::channel();
        self.pending.push(PendingTransition {
            ready: ready_tx,
            finished: finished_tx,
        });
        if self.auto_ready {
            self.resolve_ready();
        }
        tracing::trace!("headless: view transition #{} started", self.started);
        ViewTransition { ready, finished }
    }
}
