//! Full-screen circular reveal
//!
//! After the theme swap has been committed behind a synchronized view
//! transition, a clip circle grows from the toggle until it covers the
//! farthest viewport corner, uncovering the new theme over the old one.

use solstice_animation::{AnimatedValue, AnimationScheduler, TweenOptions};
use solstice_core::{Point, Rect, Size};
use solstice_path::ring::format_number;
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::oneshot;

/// Where the reveal starts and how far it must grow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealGeometry {
    pub center: Point,
    pub max_radius: f32,
}

impl RevealGeometry {
    /// Geometry for a control at `bounds` inside a `viewport`
    pub fn compute(bounds: Rect, viewport: Size) -> Self {
        let center = bounds.center();
        let dx = center.x.max(viewport.width - center.x);
        let dy = center.y.max(viewport.height - center.y);
        Self {
            center,
            max_radius: dx.hypot(dy),
        }
    }
}

/// Clip region applied to the incoming theme
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipCircle {
    pub center: Point,
    pub radius: f32,
}

impl ClipCircle {
    /// CSS `clip-path` value
    pub fn to_css(&self) -> String {
        format!(
            "circle({}px at {}px {}px)",
            format_number(self.radius),
            format_number(self.center.x),
            format_number(self.center.y)
        )
    }
}

/// Animates the reveal clip circle
///
/// Not re-entrant: one reveal runs at a time and it is never cancelled by
/// another request.
pub struct RevealTransition {
    options: TweenOptions,
    radius: AnimatedValue,
    geometry: Option<RevealGeometry>,
    active: Rc<Cell<bool>>,
    played: usize,
}

impl RevealTransition {
    pub fn new(options: TweenOptions) -> Self {
        Self {
            options,
            radius: AnimatedValue::new(0.0),
            geometry: None,
            active: Rc::new(Cell::new(false)),
            played: 0,
        }
    }

    /// True from the start of a synchronized swap until the circle is full
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Mark a synchronized swap as started; the circle follows once it is ready
    pub fn begin(&mut self) {
        self.active.set(true);
        self.geometry = None;
    }

    /// The swap was abandoned before the reveal could start
    pub fn abort(&mut self, scheduler: &mut AnimationScheduler) {
        self.radius.stop(scheduler);
        self.geometry = None;
        self.active.set(false);
    }

    /// Grow the clip circle; the receiver fires when it covers the viewport
    pub fn play(
        &mut self,
        scheduler: &mut AnimationScheduler,
        geometry: RevealGeometry,
    ) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let active = self.active.clone();

        self.active.set(true);
        self.geometry = Some(geometry);
        self.played += 1;
        self.radius.set_immediate(scheduler, 0.0);
        self.radius
            .animate_to_then(scheduler, geometry.max_radius, self.options, move || {
                active.set(false);
                let _ = tx.send(());
            });

        tracing::debug!(
            "reveal: from ({:.1}, {:.1}) to radius {:.1}",
            geometry.center.x,
            geometry.center.y,
            geometry.max_radius
        );
        rx
    }

    /// Current clip, `None` unless the circle is growing
    pub fn clip(&self) -> Option<ClipCircle> {
        if !self.is_active() {
            return None;
        }
        self.geometry.map(|geometry| ClipCircle {
            center: geometry.center,
            radius: self.radius.get(),
        })
    }

    /// Geometry of the latest reveal
    pub fn geometry(&self) -> Option<RevealGeometry> {
        self.geometry
    }

    /// Number of reveals started so far
    pub fn play_count(&self) -> usize {
        self.played
    }
}
