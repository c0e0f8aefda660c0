//! Solstice Animation System
//!
//! Time-based tweens driven by a cooperative, single-threaded frame scheduler.
//!
//! # Features
//!
//! - **Easing**: CSS keyword curves and arbitrary cubic beziers
//! - **Tweens**: animate a value from A to B over a duration, with delay
//! - **Scheduler**: ticks every tween once per frame, reports per-frame values
//!   and completion, and isolates panicking callbacks
//! - **Retargetable**: [`AnimatedValue`] restarts from its live value when
//!   interrupted, never from the previous target

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{AnimationScheduler, TweenBuilder, TweenId};
pub use tween::{AnimatedValue, Tween, TweenOptions};
