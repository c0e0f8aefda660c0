//! Tweens and retargetable animated values

use crate::easing::Easing;
use crate::scheduler::{AnimationScheduler, TweenId};
use std::cell::Cell;
use std::rc::Rc;

/// Timing for a single tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenOptions {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Easing,
}

impl TweenOptions {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            easing: Easing::Linear,
        }
    }

    /// Builder: set delay before the tween starts moving
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Builder: set easing
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Delay plus duration
    pub fn total_ms(&self) -> u32 {
        self.delay_ms + self.duration_ms
    }
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self::new(300)
    }
}

/// Animates a value from `from` to `to`
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    options: TweenOptions,
    /// Milliseconds since start; negative while delayed
    elapsed_ms: f32,
    finished: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, options: TweenOptions) -> Self {
        Self {
            from,
            to,
            options,
            elapsed_ms: -(options.delay_ms as f32),
            finished: false,
        }
    }

    pub fn from(&self) -> f32 {
        self.from
    }

    pub fn to(&self) -> f32 {
        self.to
    }

    pub fn options(&self) -> &TweenOptions {
        &self.options
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Linear progress through the duration (0.0 to 1.0), ignoring delay
    pub fn progress(&self) -> f32 {
        if self.finished {
            return 1.0;
        }
        if self.elapsed_ms <= 0.0 {
            return 0.0;
        }
        if self.options.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms / self.options.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        if self.finished {
            return self.to;
        }
        let eased = self.options.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Advance by `dt_ms`; returns true once the tween has finished
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.finished {
            return true;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.options.duration_ms as f32 {
            self.elapsed_ms = self.options.duration_ms as f32;
            self.finished = true;
        }
        self.finished
    }

    /// Jump straight to the end value
    pub fn settle(&mut self) {
        self.elapsed_ms = self.options.duration_ms as f32;
        self.finished = true;
    }
}

/// A scalar that animates towards targets on an [`AnimationScheduler`]
///
/// Retargeting stops the running tween and starts the next one from the
/// live value, so interrupted animations reverse smoothly instead of snapping.
///
/// ```rust
/// use solstice_animation::{AnimatedValue, AnimationScheduler, TweenOptions};
///
/// let mut scheduler = AnimationScheduler::new();
/// let mut progress = AnimatedValue::new(0.0);
///
/// progress.animate_to(&mut scheduler, 1.0, TweenOptions::new(100));
/// scheduler.advance(50.0);
/// let midway = progress.get();
///
/// progress.animate_to(&mut scheduler, 0.0, TweenOptions::new(100));
/// assert_eq!(progress.get(), midway);
/// ```
#[derive(Debug)]
pub struct AnimatedValue {
    value: Rc<Cell<f32>>,
    target: f32,
    tween: Option<TweenId>,
}

impl AnimatedValue {
    pub fn new(initial: f32) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
            target: initial,
            tween: None,
        }
    }

    /// Live value
    pub fn get(&self) -> f32 {
        self.value.get()
    }

    /// Value the most recent animation is heading to
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if a tween is still driving this value
    pub fn is_animating(&self, scheduler: &AnimationScheduler) -> bool {
        self.tween.is_some_and(|id| scheduler.is_active(id))
    }

    /// Animate from the live value to `target`
    pub fn animate_to(
        &mut self,
        scheduler: &mut AnimationScheduler,
        target: f32,
        options: TweenOptions,
    ) -> TweenId {
        self.animate_to_then(scheduler, target, options, || {})
    }

    /// Animate from the live value to `target`, calling `on_complete` when
    /// the tween finishes (not when it is interrupted)
    pub fn animate_to_then<F>(
        &mut self,
        scheduler: &mut AnimationScheduler,
        target: f32,
        options: TweenOptions,
        on_complete: F,
    ) -> TweenId
    where
        F: FnOnce() + 'static,
    {
        self.stop(scheduler);
        self.target = target;
        let id = scheduler
            .animate(self.get(), target, options)
            .bind(self.value.clone())
            .on_complete(on_complete)
            .start();
        self.tween = Some(id);
        id
    }

    /// Stop any running tween and set the value directly
    pub fn set_immediate(&mut self, scheduler: &mut AnimationScheduler, value: f32) {
        self.stop(scheduler);
        self.target = value;
        self.value.set(value);
    }

    /// Stop the running tween, leaving the live value where it is
    pub fn stop(&mut self, scheduler: &mut AnimationScheduler) {
        if let Some(id) = self.tween.take() {
            scheduler.stop(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_respects_delay() {
        let mut tween = Tween::new(0.0, 10.0, TweenOptions::new(100).delay(50));
        tween.tick(40.0);
        assert_eq!(tween.value(), 0.0);
        tween.tick(20.0);
        assert!((tween.value() - 1.0).abs() < 1e-4);
        assert!(!tween.tick(80.0));
        assert!(tween.tick(20.0));
        assert_eq!(tween.value(), 10.0);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut tween = Tween::new(3.0, 7.0, TweenOptions::new(0));
        assert!(tween.tick(0.0));
        assert_eq!(tween.value(), 7.0);
    }

    #[test]
    fn eased_value_follows_curve() {
        let mut tween = Tween::new(0.0, 1.0, TweenOptions::new(100).ease(Easing::EaseInOut));
        tween.tick(25.0);
        assert!(tween.value() < 0.25);
    }

    #[test]
    fn retarget_starts_from_live_value() {
        let mut scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(0.0);

        value.animate_to(&mut scheduler, 1.0, TweenOptions::new(100));
        scheduler.advance(30.0);
        let live = value.get();
        assert!(live > 0.0 && live < 1.0);

        value.animate_to(&mut scheduler, 0.0, TweenOptions::new(100));
        assert_eq!(value.get(), live);
        scheduler.advance(10.0);
        assert!(value.get() < live);

        scheduler.advance(200.0);
        assert_eq!(value.get(), 0.0);
        assert!(!value.is_animating(&scheduler));
    }

    #[test]
    fn interrupted_tween_does_not_complete() {
        let mut scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(0.0);
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        value.animate_to_then(&mut scheduler, 1.0, TweenOptions::new(100), move || {
            f.set(f.get() + 1)
        });
        scheduler.advance(50.0);
        value.animate_to(&mut scheduler, 0.0, TweenOptions::new(100));
        scheduler.advance(500.0);

        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn set_immediate_cancels_tween() {
        let mut scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(0.0);
        value.animate_to(&mut scheduler, 1.0, TweenOptions::new(100));
        value.set_immediate(&mut scheduler, 0.25);
        scheduler.advance(100.0);
        assert_eq!(value.get(), 0.25);
        assert_eq!(value.target(), 0.25);
        assert_eq!(scheduler.tween_count(), 0);
    }
}
