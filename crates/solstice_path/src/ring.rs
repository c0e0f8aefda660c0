//! Closed polygon rings sampled from paths

use crate::error::{PathError, Result};
use lyon::math::Point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

/// Tolerance used when flattening curves before resampling
pub const FLATTEN_TOLERANCE: f32 = 0.01;

/// Smallest segment length accepted when resampling
pub const MIN_SEGMENT_LENGTH: f32 = 0.05;

/// Rings never have fewer points than a triangle
const MIN_RING_POINTS: usize = 3;

/// A closed polygon; the edge from the last point back to the first is
/// implicit
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Sample the first subpath of `path` into a normalized ring
    ///
    /// Points are spaced evenly along the outline, no further apart than
    /// `max_segment_length`, with a consistent winding direction.
    pub fn from_path(path: &Path, max_segment_length: f32) -> Result<Self> {
        let max_segment_length = max_segment_length.max(MIN_SEGMENT_LENGTH);
        let polyline = first_subpath_polyline(path);
        let points = resample(&polyline, max_segment_length)?;

        let mut ring = Ring { points };
        ring.normalize(max_segment_length);
        Ok(ring)
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for one winding direction, negative for the other
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x * b.y - b.x * a.y;
        }
        twice_area / 2.0
    }

    /// Length of the edge starting at `index`
    fn edge_length(&self, index: usize) -> f32 {
        let n = self.points.len();
        self.points[index].distance_to(self.points[(index + 1) % n])
    }

    pub fn perimeter(&self) -> f32 {
        (0..self.points.len()).map(|i| self.edge_length(i)).sum()
    }

    fn normalize(&mut self, max_segment_length: f32) {
        if self.points.len() > 1 {
            let first = self.points[0];
            if let Some(last) = self.points.last() {
                if first.distance_to(*last) < f32::EPSILON {
                    self.points.pop();
                }
            }
        }
        if self.signed_area() > 0.0 {
            self.points.reverse();
        }
        self.bisect(max_segment_length);
    }

    /// Split every edge longer than `max_segment_length`
    pub fn bisect(&mut self, max_segment_length: f32) {
        let max_segment_length = max_segment_length.max(MIN_SEGMENT_LENGTH);
        let mut i = 0;
        while i < self.points.len() {
            if self.edge_length(i) > max_segment_length {
                let n = self.points.len();
                let mid = self.points[i].lerp(self.points[(i + 1) % n], 0.5);
                self.points.insert(i + 1, mid);
            } else {
                i += 1;
            }
        }
    }

    /// Add `count` points by repeatedly halving the longest edge
    pub fn add_points(&mut self, count: usize) {
        for _ in 0..count {
            let n = self.points.len();
            let Some(longest) = (0..n).max_by(|&a, &b| {
                self.edge_length(a)
                    .partial_cmp(&self.edge_length(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            }) else {
                return;
            };
            let mid = self.points[longest].lerp(self.points[(longest + 1) % n], 0.5);
            self.points.insert(longest + 1, mid);
        }
    }

    /// Rotate the start index so the ring lines up with `reference`
    ///
    /// Picks the offset with the smallest summed squared distance between
    /// corresponding points. Both rings must have the same length.
    pub fn rotate_to_match(&mut self, reference: &Ring) {
        let n = self.points.len();
        if n == 0 || n != reference.len() {
            return;
        }

        let mut best_offset = 0;
        let mut best_cost = f32::INFINITY;
        for offset in 0..n {
            let cost: f32 = (0..n)
                .map(|i| {
                    let p = self.points[(i + offset) % n];
                    let q = reference.points[i];
                    (p - q).square_length()
                })
                .sum();
            if cost < best_cost {
                best_cost = cost;
                best_offset = offset;
            }
        }
        self.points.rotate_left(best_offset);
    }

    /// Pointwise interpolation between two rings of equal length
    pub fn lerp(&self, other: &Ring, t: f32) -> Vec<Point> {
        self.points
            .iter()
            .zip(other.points.iter())
            .map(|(a, b)| a.lerp(*b, t))
            .collect()
    }
}

/// Serialize ring points as SVG path data
pub fn path_data(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 12 + 2);
    for (i, p) in points.iter().enumerate() {
        out.push(if i == 0 { 'M' } else { 'L' });
        out.push_str(&format_number(p.x));
        out.push(',');
        out.push_str(&format_number(p.y));
    }
    if !points.is_empty() {
        out.push('Z');
    }
    out
}

/// Three decimals, trailing zeros dropped
pub fn format_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Center of the bounding box of every subpath, `None` for an empty path
pub fn outline_center(path: &Path) -> Option<Point> {
    let mut bounds: Option<(Point, Point)> = None;
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        let at = match event {
            PathEvent::Begin { at } => at,
            PathEvent::Line { to, .. } => to,
            _ => continue,
        };
        bounds = Some(match bounds {
            None => (at, at),
            Some((min, max)) => (min.min(at), max.max(at)),
        });
    }
    bounds.map(|(min, max)| min.lerp(max, 0.5))
}

/// Flatten the first subpath into a polyline, including the closing edge
fn first_subpath_polyline(path: &Path) -> Vec<Point> {
    let mut polyline = Vec::new();
    let mut subpaths = 0;

    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                subpaths += 1;
                if subpaths > 1 {
                    break;
                }
                polyline.push(at);
            }
            PathEvent::Line { to, .. } => polyline.push(to),
            PathEvent::End { first, close, .. } => {
                if close {
                    polyline.push(first);
                }
            }
            _ => {}
        }
    }

    if subpaths > 1 {
        tracing::trace!("ring: ignoring subpaths after the first");
    }
    polyline
}

/// Evenly spaced samples along a polyline, excluding its end point
fn resample(polyline: &[Point], max_segment_length: f32) -> Result<Vec<Point>> {
    let lengths: Vec<f32> = polyline
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .collect();
    let total: f32 = lengths.iter().sum();
    if !(total > f32::EPSILON) {
        return Err(PathError::Degenerate);
    }

    let count = ((total / max_segment_length).ceil() as usize).max(MIN_RING_POINTS);
    let step = total / count as f32;

    let mut samples = Vec::with_capacity(count);
    let mut segment = 0;
    let mut walked = 0.0;
    for i in 0..count {
        let distance = i as f32 * step;
        while segment + 1 < lengths.len() && walked + lengths[segment] < distance {
            walked += lengths[segment];
            segment += 1;
        }
        let length = lengths[segment];
        let t = if length > 0.0 {
            ((distance - walked) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        samples.push(polyline[segment].lerp(polyline[segment + 1], t));
    }
    Ok(samples)
}
