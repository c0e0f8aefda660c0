//! Sun/moon body morph

use crate::icon::{IconState, MOON_PATH, SUN_PATH};
use solstice_animation::{AnimatedValue, AnimationScheduler, Easing, TweenId, TweenOptions};
use solstice_path::{PathInterpolator, Result};

/// Drives the glyph body between the sun (progress 0) and moon (progress 1)
///
/// Retargeting always starts from the live progress, so a click during a
/// sweep reverses it smoothly.
pub struct PathMorpher {
    interpolator: PathInterpolator,
    progress: AnimatedValue,
    options: TweenOptions,
}

impl PathMorpher {
    pub fn new(
        sun: &str,
        moon: &str,
        max_segment_length: f32,
        options: TweenOptions,
        initial: IconState,
    ) -> Result<Self> {
        Ok(Self {
            interpolator: PathInterpolator::new(sun, moon, max_segment_length)?,
            progress: AnimatedValue::new(initial.progress()),
            options,
        })
    }

    /// Built-in glyphs, 400 ms ease-in-out
    pub fn with_defaults(initial: IconState) -> Result<Self> {
        Self::new(
            SUN_PATH,
            MOON_PATH,
            solstice_path::interpolate::DEFAULT_MAX_SEGMENT_LENGTH,
            TweenOptions::new(400).ease(Easing::EaseInOut),
            initial,
        )
    }

    pub fn interpolator(&self) -> &PathInterpolator {
        &self.interpolator
    }

    /// Live morph progress
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    /// Progress the morph is heading to
    pub fn target(&self) -> f32 {
        self.progress.target()
    }

    /// Body path data at the live progress
    pub fn path(&self) -> String {
        self.interpolator.at(self.progress())
    }

    pub fn is_animating(&self, scheduler: &AnimationScheduler) -> bool {
        self.progress.is_animating(scheduler)
    }

    /// Sweep towards `target`, replacing any sweep in flight
    pub fn animate_to(&mut self, scheduler: &mut AnimationScheduler, target: IconState) -> TweenId {
        tracing::trace!(
            "morph: {:.3} -> {}",
            self.progress.get(),
            target.progress()
        );
        self.progress
            .animate_to(scheduler, target.progress(), self.options)
    }

    /// Stop and jump straight to `target`
    pub fn jump_to(&mut self, scheduler: &mut AnimationScheduler, target: IconState) {
        self.progress.set_immediate(scheduler, target.progress());
    }

    pub fn stop(&mut self, scheduler: &mut AnimationScheduler) {
        self.progress.stop(scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rests_on_initial_glyph() {
        let morpher = PathMorpher::with_defaults(IconState::Moon).unwrap();
        assert_eq!(morpher.progress(), 1.0);
        assert_eq!(morpher.path(), MOON_PATH);
    }

    #[test]
    fn sweep_reaches_target() {
        let mut scheduler = AnimationScheduler::new();
        let mut morpher = PathMorpher::with_defaults(IconState::Sun).unwrap();

        morpher.animate_to(&mut scheduler, IconState::Moon);
        scheduler.advance(200.0);
        let mid = morpher.progress();
        assert!(mid > 0.0 && mid < 1.0);
        assert_ne!(morpher.path(), SUN_PATH);
        assert!(morpher.is_animating(&scheduler));

        scheduler.advance(200.0);
        assert_eq!(morpher.progress(), 1.0);
        assert_eq!(morpher.path(), MOON_PATH);
        assert!(!morpher.is_animating(&scheduler));
    }

    #[test]
    fn reversal_starts_from_live_progress() {
        let mut scheduler = AnimationScheduler::new();
        let mut morpher = PathMorpher::with_defaults(IconState::Sun).unwrap();

        morpher.animate_to(&mut scheduler, IconState::Moon);
        scheduler.advance(100.0);
        let live = morpher.progress();

        morpher.animate_to(&mut scheduler, IconState::Sun);
        assert_eq!(morpher.progress(), live);
        assert_eq!(morpher.target(), 0.0);
        assert_eq!(scheduler.tween_count(), 1);

        scheduler.advance(400.0);
        assert_eq!(morpher.progress(), 0.0);
    }

    #[test]
    fn jump_stops_the_sweep() {
        let mut scheduler = AnimationScheduler::new();
        let mut morpher = PathMorpher::with_defaults(IconState::Sun).unwrap();
        morpher.animate_to(&mut scheduler, IconState::Moon);
        scheduler.advance(100.0);
        morpher.jump_to(&mut scheduler, IconState::Sun);
        assert_eq!(morpher.progress(), 0.0);
        assert!(!scheduler.has_active_animations());
    }
}
