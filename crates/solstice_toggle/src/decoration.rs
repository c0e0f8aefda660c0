//! Decoration poses
//!
//! The icon container, the glyph body, eight rays and two star strokes each
//! animate between named poses. What every element does in every pose lives
//! in a [`DecorationTable`]; the [`DecorationAnimator`] plays poses from that
//! table and reports when a pose has fully settled.

use crate::icon::PoseKey;
use smallvec::SmallVec;
use solstice_animation::{AnimatedValue, AnimationScheduler, Easing, TweenOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Hover offsets of each ray, pulled a half unit towards the center
const RAY_HOVER_X: [f32; 8] = [0.0, -0.5, -1.0, -0.5, 0.0, 0.5, 1.0, 0.5];
const RAY_HOVER_Y: [f32; 8] = [1.0, 0.5, 0.0, -0.5, -1.0, -0.5, 0.0, 0.5];

/// Moon offsets of each ray, collapsed two units towards the center
const RAY_MOON_X: [f32; 8] = [0.0, -1.0, -2.0, -1.0, 0.0, 1.0, 2.0, 1.0];
const RAY_MOON_Y: [f32; 8] = [2.0, 1.0, 0.0, -1.0, -2.0, -1.0, 0.0, 1.0];

/// Default per-ray stagger when the rays return after the moon
pub const DEFAULT_RAY_STAGGER_MS: u32 = 60;

/// One animated part of the icon
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Container,
    Body,
    Ray(u8),
    Star(u8),
}

impl ElementId {
    pub const RAY_COUNT: u8 = 8;
    pub const STAR_COUNT: u8 = 2;

    /// Every element, in table order
    pub fn all() -> impl Iterator<Item = ElementId> {
        [ElementId::Container, ElementId::Body]
            .into_iter()
            .chain((0..Self::RAY_COUNT).map(ElementId::Ray))
            .chain((0..Self::STAR_COUNT).map(ElementId::Star))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Container => f.write_str("container"),
            ElementId::Body => f.write_str("body"),
            ElementId::Ray(i) => write!(f, "ray{i}"),
            ElementId::Star(i) => write!(f, "star{i}"),
        }
    }
}

/// Animatable geometry of one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementGeometry {
    /// Visible fraction of the stroke
    pub path_length: f32,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rotate: f32,
}

impl Default for ElementGeometry {
    fn default() -> Self {
        Self {
            path_length: 1.0,
            scale: 1.0,
            x: 0.0,
            y: 0.0,
            rotate: 0.0,
        }
    }
}

impl ElementGeometry {
    pub fn lerp(&self, other: &ElementGeometry, t: f32) -> ElementGeometry {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        ElementGeometry {
            path_length: mix(self.path_length, other.path_length),
            scale: mix(self.scale, other.scale),
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            rotate: mix(self.rotate, other.rotate),
        }
    }
}

/// Properties a pose sets; unset properties keep their current value
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryPatch {
    pub path_length: Option<f32>,
    pub scale: Option<f32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub rotate: Option<f32>,
}

impl GeometryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_length(mut self, value: f32) -> Self {
        self.path_length = Some(value);
        self
    }

    pub fn scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    /// Geometry after applying this patch to `base`
    pub fn apply(&self, base: ElementGeometry) -> ElementGeometry {
        ElementGeometry {
            path_length: self.path_length.unwrap_or(base.path_length),
            scale: self.scale.unwrap_or(base.scale),
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            rotate: self.rotate.unwrap_or(base.rotate),
        }
    }
}

/// Timing of one element entering one pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseTiming {
    pub duration_ms: u32,
    pub delay_ms: u32,
    /// Replaces `delay_ms` when the previous pose belonged to the other icon
    pub cross_delay_ms: Option<u32>,
    pub easing: Easing,
}

impl PoseTiming {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            cross_delay_ms: None,
            easing: Easing::EaseInOut,
        }
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn cross_delay(mut self, delay_ms: u32) -> Self {
        self.cross_delay_ms = Some(delay_ms);
        self
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Effective tween options
    pub fn options(&self, crossing: bool) -> TweenOptions {
        let delay = match (crossing, self.cross_delay_ms) {
            (true, Some(delay)) => delay,
            _ => self.delay_ms,
        };
        TweenOptions::new(self.duration_ms)
            .delay(delay)
            .ease(self.easing)
    }
}

/// An element's target and timing for one pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseEntry {
    pub pose: PoseKey,
    pub patch: GeometryPatch,
    pub timing: PoseTiming,
}

/// Every pose an element defines
#[derive(Clone, Debug, PartialEq)]
pub struct ElementTrack {
    pub element: ElementId,
    pub entries: SmallVec<[PoseEntry; 4]>,
}

impl ElementTrack {
    fn new(element: ElementId) -> Self {
        Self {
            element,
            entries: SmallVec::new(),
        }
    }

    fn with(mut self, pose: PoseKey, patch: GeometryPatch, timing: PoseTiming) -> Self {
        self.entries.push(PoseEntry { pose, patch, timing });
        self
    }

    pub fn entry(&self, pose: PoseKey) -> Option<&PoseEntry> {
        self.entries.iter().find(|entry| entry.pose == pose)
    }
}

/// Per-element pose configuration, built once
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationTable {
    tracks: Vec<ElementTrack>,
}

impl Default for DecorationTable {
    fn default() -> Self {
        Self::with_ray_stagger(DEFAULT_RAY_STAGGER_MS)
    }
}

impl DecorationTable {
    /// The standard choreography with a custom ray stagger step
    pub fn with_ray_stagger(stagger_ms: u32) -> Self {
        let still = GeometryPatch::new().rotate(0.0).scale(1.0);
        let quick = PoseTiming::new(200);

        let mut tracks = Vec::with_capacity(12);

        tracks.push(
            ElementTrack::new(ElementId::Container)
                .with(PoseKey::Sun, still, quick)
                .with(PoseKey::SunHover, still, quick)
                .with(PoseKey::Moon, still, quick)
                .with(PoseKey::MoonHover, GeometryPatch::new().rotate(-15.0).scale(0.9), quick),
        );

        tracks.push(
            ElementTrack::new(ElementId::Body)
                .with(PoseKey::Sun, GeometryPatch::new().scale(1.0), quick)
                .with(PoseKey::SunHover, GeometryPatch::new().scale(0.8), quick)
                .with(PoseKey::Moon, GeometryPatch::new().scale(1.0), quick)
                .with(PoseKey::MoonHover, GeometryPatch::new().scale(1.0), quick),
        );

        for i in 0..ElementId::RAY_COUNT {
            let n = i as usize;
            tracks.push(
                ElementTrack::new(ElementId::Ray(i))
                    .with(
                        PoseKey::Sun,
                        GeometryPatch::new().path_length(1.0).scale(1.0).offset(0.0, 0.0),
                        quick.cross_delay((n as u32 + 1) * stagger_ms),
                    )
                    .with(
                        PoseKey::SunHover,
                        GeometryPatch::new()
                            .path_length(0.1)
                            .offset(RAY_HOVER_X[n], RAY_HOVER_Y[n]),
                        quick,
                    )
                    .with(
                        PoseKey::Moon,
                        GeometryPatch::new()
                            .path_length(0.1)
                            .scale(0.0)
                            .offset(RAY_MOON_X[n], RAY_MOON_Y[n]),
                        PoseTiming::new(100),
                    ),
            );
        }

        for j in 0..ElementId::STAR_COUNT {
            tracks.push(
                ElementTrack::new(ElementId::Star(j))
                    .with(PoseKey::Sun, GeometryPatch::new().scale(0.0).path_length(0.0), quick)
                    .with(
                        PoseKey::Moon,
                        GeometryPatch::new().scale(1.0).path_length(1.0),
                        quick.delay(200),
                    ),
            );
        }

        Self { tracks }
    }

    pub fn tracks(&self) -> &[ElementTrack] {
        &self.tracks
    }

    pub fn entry(&self, element: ElementId, pose: PoseKey) -> Option<&PoseEntry> {
        self.tracks
            .iter()
            .find(|track| track.element == element)
            .and_then(|track| track.entry(pose))
    }

    /// Element that finishes last when `pose` is played
    ///
    /// Ties go to the element later in table order.
    pub fn sentinel(&self, pose: PoseKey, crossing: bool) -> Option<ElementId> {
        let mut best: Option<(u32, ElementId)> = None;
        for track in &self.tracks {
            if let Some(entry) = track.entry(pose) {
                let total = entry.timing.options(crossing).total_ms();
                if best.map_or(true, |(longest, _)| total >= longest) {
                    best = Some((total, track.element));
                }
            }
        }
        best.map(|(_, element)| element)
    }

    /// Geometry every element holds once `pose` has settled from defaults
    pub fn resting_geometry(&self, element: ElementId, pose: PoseKey) -> ElementGeometry {
        self.entry(element, pose)
            .map(|entry| entry.patch.apply(ElementGeometry::default()))
            .unwrap_or_default()
    }
}

/// Emitted once when the sentinel of the latest pose finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoseSettled {
    pub pose: PoseKey,
    pub generation: u64,
}

struct ElementValues {
    path_length: AnimatedValue,
    scale: AnimatedValue,
    x: AnimatedValue,
    y: AnimatedValue,
    rotate: AnimatedValue,
}

impl ElementValues {
    fn new(geometry: ElementGeometry) -> Self {
        Self {
            path_length: AnimatedValue::new(geometry.path_length),
            scale: AnimatedValue::new(geometry.scale),
            x: AnimatedValue::new(geometry.x),
            y: AnimatedValue::new(geometry.y),
            rotate: AnimatedValue::new(geometry.rotate),
        }
    }

    fn geometry(&self) -> ElementGeometry {
        ElementGeometry {
            path_length: self.path_length.get(),
            scale: self.scale.get(),
            x: self.x.get(),
            y: self.y.get(),
            rotate: self.rotate.get(),
        }
    }

    fn targets(&mut self, patch: &GeometryPatch) -> SmallVec<[(&mut AnimatedValue, f32); 5]> {
        let mut out = SmallVec::new();
        if let Some(v) = patch.path_length {
            out.push((&mut self.path_length, v));
        }
        if let Some(v) = patch.scale {
            out.push((&mut self.scale, v));
        }
        if let Some(v) = patch.x {
            out.push((&mut self.x, v));
        }
        if let Some(v) = patch.y {
            out.push((&mut self.y, v));
        }
        if let Some(v) = patch.rotate {
            out.push((&mut self.rotate, v));
        }
        out
    }

    fn stop(&mut self, scheduler: &mut AnimationScheduler) {
        for value in [
            &mut self.path_length,
            &mut self.scale,
            &mut self.x,
            &mut self.y,
            &mut self.rotate,
        ] {
            value.stop(scheduler);
        }
    }
}

type CompletionQueue = Rc<RefCell<VecDeque<(u64, ElementId)>>>;

/// Plays decoration poses on an [`AnimationScheduler`]
///
/// Each play retargets every participating element from wherever it is
/// right now. Plays are never queued; a newer play supersedes the older one.
pub struct DecorationAnimator {
    table: DecorationTable,
    elements: Vec<(ElementId, ElementValues)>,
    pose: PoseKey,
    generation: u64,
    sentinel: Option<ElementId>,
    settled: bool,
    completions: CompletionQueue,
}

impl DecorationAnimator {
    /// Create an animator resting in `pose`
    pub fn new(table: DecorationTable, pose: PoseKey) -> Self {
        let elements = table
            .tracks()
            .iter()
            .map(|track| {
                let geometry = table.resting_geometry(track.element, pose);
                (track.element, ElementValues::new(geometry))
            })
            .collect();

        Self {
            table,
            elements,
            pose,
            generation: 0,
            sentinel: None,
            settled: true,
            completions: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn table(&self) -> &DecorationTable {
        &self.table
    }

    /// Most recently requested pose
    pub fn pose(&self) -> PoseKey {
        self.pose
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Element whose completion ends the current play
    pub fn sentinel(&self) -> Option<ElementId> {
        self.sentinel
    }

    /// Whether the latest pose has finished animating
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Live geometry of an element
    pub fn geometry(&self, element: ElementId) -> ElementGeometry {
        self.elements
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, values)| values.geometry())
            .unwrap_or_default()
    }

    /// Live geometry of every element, in table order
    pub fn geometries(&self) -> Vec<(ElementId, ElementGeometry)> {
        self.elements
            .iter()
            .map(|(id, values)| (*id, values.geometry()))
            .collect()
    }

    /// Start animating every element that defines `pose`
    ///
    /// Returns the sentinel element.
    pub fn play(&mut self, scheduler: &mut AnimationScheduler, pose: PoseKey) -> Option<ElementId> {
        let crossing = pose.icon() != self.pose.icon();
        self.generation += 1;
        self.pose = pose;
        self.sentinel = self.table.sentinel(pose, crossing);
        self.settled = self.sentinel.is_none();

        let generation = self.generation;
        for (element, values) in self.elements.iter_mut() {
            let Some(entry) = self.table.entry(*element, pose) else {
                continue;
            };
            let options = entry.timing.options(crossing);
            let mut reporter = Some((self.completions.clone(), *element));
            for (value, target) in values.targets(&entry.patch) {
                match reporter.take() {
                    Some((queue, element)) => {
                        value.animate_to_then(scheduler, target, options, move || {
                            queue.borrow_mut().push_back((generation, element));
                        });
                    }
                    None => {
                        value.animate_to(scheduler, target, options);
                    }
                }
            }
        }

        tracing::debug!(
            "decoration: play {} (generation {}, sentinel {:?}, crossing {})",
            pose,
            generation,
            self.sentinel,
            crossing
        );
        self.sentinel
    }

    /// Stop every element and jump to the resting geometry of `pose`
    pub fn snap(&mut self, scheduler: &mut AnimationScheduler, pose: PoseKey) {
        self.generation += 1;
        self.pose = pose;
        self.sentinel = None;
        self.settled = true;
        self.completions.borrow_mut().clear();

        for (element, values) in self.elements.iter_mut() {
            values.stop(scheduler);
            if let Some(entry) = self.table.entry(*element, pose) {
                for (value, target) in values.targets(&entry.patch) {
                    value.set_immediate(scheduler, target);
                }
            }
        }
        tracing::debug!("decoration: snapped to {} (generation {})", pose, self.generation);
    }

    /// Stop every element where it is
    pub fn stop(&mut self, scheduler: &mut AnimationScheduler) {
        for (_, values) in self.elements.iter_mut() {
            values.stop(scheduler);
        }
        self.completions.borrow_mut().clear();
    }

    /// Consume element completions reported since the last drain
    ///
    /// Returns the settle notice when the current play's sentinel finished.
    /// Completions from superseded plays are dropped.
    pub fn drain(&mut self) -> Option<PoseSettled> {
        let mut settled = None;
        let completions: Vec<(u64, ElementId)> = self.completions.borrow_mut().drain(..).collect();
        for (generation, element) in completions {
            if generation != self.generation {
                tracing::trace!("decoration: stale completion of {} from generation {}", element, generation);
                continue;
            }
            if !self.settled && Some(element) == self.sentinel {
                self.settled = true;
                settled = Some(PoseSettled {
                    pose: self.pose,
                    generation,
                });
                tracing::debug!("decoration: {} settled (generation {})", self.pose, generation);
            }
        }
        settled
    }
}
