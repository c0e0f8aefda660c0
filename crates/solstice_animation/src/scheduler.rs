//! Animation scheduler
//!
//! Owns every running tween and advances them once per frame. All work runs
//! on the caller's thread; there is no background ticking.

use crate::tween::{Tween, TweenOptions};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Instant;

new_key_type! {
    pub struct TweenId;
}

type FrameCallback = Box<dyn FnMut(f32)>;
type CompleteCallback = Box<dyn FnOnce()>;

struct TweenEntry {
    tween: Tween,
    sink: Option<Rc<Cell<f32>>>,
    on_frame: Option<FrameCallback>,
    on_complete: Option<CompleteCallback>,
}

/// Builder returned by [`AnimationScheduler::animate`]
#[must_use = "call start() to schedule the tween"]
pub struct TweenBuilder<'a> {
    scheduler: &'a mut AnimationScheduler,
    entry: TweenEntry,
}

impl TweenBuilder<'_> {
    /// Write every frame's value into a shared cell
    pub fn bind(mut self, sink: Rc<Cell<f32>>) -> Self {
        sink.set(self.entry.tween.value());
        self.entry.sink = Some(sink);
        self
    }

    /// Call back with the value on every frame
    pub fn on_frame<F: FnMut(f32) + 'static>(mut self, callback: F) -> Self {
        self.entry.on_frame = Some(Box::new(callback));
        self
    }

    /// Call back once when the tween reaches its end value
    pub fn on_complete<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.entry.on_complete = Some(Box::new(callback));
        self
    }

    /// Schedule the tween
    pub fn start(self) -> TweenId {
        self.scheduler.tweens.insert(self.entry)
    }
}

/// The animation scheduler that ticks all active tweens
pub struct AnimationScheduler {
    tweens: SlotMap<TweenId, TweenEntry>,
    last_frame: Instant,
    elapsed_ms: f64,
    frame: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
            last_frame: Instant::now(),
            elapsed_ms: 0.0,
            frame: 0,
        }
    }

    /// Start building a tween from `from` to `to`
    pub fn animate(&mut self, from: f32, to: f32, options: TweenOptions) -> TweenBuilder<'_> {
        TweenBuilder {
            scheduler: self,
            entry: TweenEntry {
                tween: Tween::new(from, to, options),
                sink: None,
                on_frame: None,
                on_complete: None,
            },
        }
    }

    /// Stop a tween without running its completion callback
    ///
    /// Returns the value it had reached.
    pub fn stop(&mut self, id: TweenId) -> Option<f32> {
        self.tweens.remove(id).map(|entry| entry.tween.value())
    }

    /// Stop every tween; no callback fires afterwards
    pub fn clear(&mut self) {
        if !self.tweens.is_empty() {
            tracing::debug!("scheduler: dropping {} running tweens", self.tweens.len());
        }
        self.tweens.clear();
    }

    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(id)
    }

    /// Current value of a running tween
    pub fn value(&self, id: TweenId) -> Option<f32> {
        self.tweens.get(id).map(|entry| entry.tween.value())
    }

    /// Check if any tweens are still running
    pub fn has_active_animations(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Get the number of running tweens
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Total time advanced so far
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Number of frames advanced so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Tick using wall-clock time since the previous tick
    pub fn tick(&mut self) -> SmallVec<[TweenId; 4]> {
        let now = Instant::now();
        let dt_ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.advance(dt_ms)
    }

    /// Advance every tween by `dt_ms` and return the ids that completed
    ///
    /// A frame or completion callback that panics is contained: the panic is
    /// logged, its tween settles at the end value, and the remaining tweens
    /// keep running.
    pub fn advance(&mut self, dt_ms: f32) -> SmallVec<[TweenId; 4]> {
        self.frame += 1;
        self.elapsed_ms += dt_ms as f64;

        let mut finished: SmallVec<[TweenId; 4]> = SmallVec::new();

        for (id, entry) in self.tweens.iter_mut() {
            let done = entry.tween.tick(dt_ms);
            let value = entry.tween.value();
            if let Some(sink) = &entry.sink {
                sink.set(value);
            }

            if let Some(callback) = entry.on_frame.as_mut() {
                if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                    tracing::error!("scheduler: frame callback panicked; settling tween {:?}", id);
                    entry.on_frame = None;
                    entry.tween.settle();
                    if let Some(sink) = &entry.sink {
                        sink.set(entry.tween.to());
                    }
                    finished.push(id);
                    continue;
                }
            }

            if done {
                finished.push(id);
            }
        }

        for id in &finished {
            let Some(entry) = self.tweens.remove(*id) else {
                continue;
            };
            if let Some(callback) = entry.on_complete {
                if catch_unwind(AssertUnwindSafe(callback)).is_err() {
                    tracing::error!("scheduler: completion callback panicked for {:?}", id);
                }
            }
        }

        tracing::trace!(
            "scheduler: frame {} dt={:.2}ms active={} completed={}",
            self.frame,
            dt_ms,
            self.tweens.len(),
            finished.len()
        );

        finished
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use std::cell::RefCell;

    #[test]
    fn frame_callback_sees_every_value() {
        let mut scheduler = AnimationScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();

        scheduler
            .animate(0.0, 100.0, TweenOptions::new(100))
            .on_frame(move |v| s.borrow_mut().push(v))
            .start();

        for _ in 0..4 {
            scheduler.advance(25.0);
        }

        assert_eq!(*seen.borrow(), vec![25.0, 50.0, 75.0, 100.0]);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn completion_fires_once_and_reports_id() {
        let mut scheduler = AnimationScheduler::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();

        let id = scheduler
            .animate(0.0, 1.0, TweenOptions::new(50).ease(Easing::EaseInOut))
            .on_complete(move || c.set(c.get() + 1))
            .start();

        assert!(scheduler.advance(30.0).is_empty());
        assert_eq!(scheduler.advance(30.0).as_slice(), &[id]);
        scheduler.advance(30.0);
        assert_eq!(count.get(), 1);
        assert!(!scheduler.is_active(id));
    }

    #[test]
    fn stop_suppresses_completion() {
        let mut scheduler = AnimationScheduler::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();

        let id = scheduler
            .animate(0.0, 1.0, TweenOptions::new(50))
            .on_complete(move || c.set(c.get() + 1))
            .start();
        scheduler.advance(10.0);
        let reached = scheduler.stop(id).unwrap();
        assert!((reached - 0.2).abs() < 1e-5);
        scheduler.advance(100.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn clear_drops_all_callbacks() {
        let mut scheduler = AnimationScheduler::new();
        let count = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let c = count.clone();
            scheduler
                .animate(0.0, 1.0, TweenOptions::new(10))
                .on_complete(move || c.set(c.get() + 1))
                .start();
        }
        scheduler.clear();
        scheduler.advance(100.0);
        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn panicking_frame_callback_settles_only_its_tween() {
        let mut scheduler = AnimationScheduler::new();
        let sink = Rc::new(Cell::new(0.0));
        let sibling = Rc::new(Cell::new(0.0));
        let completed = Rc::new(Cell::new(false));

        let done = completed.clone();
        scheduler
            .animate(0.0, 1.0, TweenOptions::new(100))
            .bind(sink.clone())
            .on_frame(|_| panic!("host scheduler failure"))
            .on_complete(move || done.set(true))
            .start();
        let sibling_id = scheduler
            .animate(0.0, 10.0, TweenOptions::new(100))
            .bind(sibling.clone())
            .start();

        scheduler.advance(10.0);

        assert_eq!(sink.get(), 1.0);
        assert!(completed.get());
        assert!(scheduler.is_active(sibling_id));
        assert_eq!(sibling.get(), 1.0);
    }

    #[test]
    fn counters_accumulate() {
        let mut scheduler = AnimationScheduler::new();
        scheduler.advance(16.0);
        scheduler.advance(16.0);
        assert_eq!(scheduler.frame(), 2);
        assert_eq!(scheduler.elapsed_ms(), 32.0);
    }
}
