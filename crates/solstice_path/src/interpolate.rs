//! Shape interpolation between two path outlines

use crate::error::Result;
use crate::parse::parse_path;
use crate::ring::{path_data, Ring};
use lyon::math::Point;

/// Default spacing between resampled outline points
pub const DEFAULT_MAX_SEGMENT_LENGTH: f32 = 1.0;

/// Progress closer than this to an endpoint yields the original path data
const ENDPOINT_EPSILON: f32 = 1e-4;

/// Precomputed morph between two outlines
///
/// Both outlines are normalized once at construction; sampling an
/// intermediate shape is a single pass of point interpolation.
#[derive(Clone, Debug)]
pub struct PathInterpolator {
    from_data: String,
    to_data: String,
    from: Ring,
    to: Ring,
}

impl PathInterpolator {
    pub fn new(from: &str, to: &str, max_segment_length: f32) -> Result<Self> {
        let mut from_ring = Ring::from_path(&parse_path(from)?, max_segment_length)?;
        let mut to_ring = Ring::from_path(&parse_path(to)?, max_segment_length)?;

        match from_ring.len().cmp(&to_ring.len()) {
            std::cmp::Ordering::Less => from_ring.add_points(to_ring.len() - from_ring.len()),
            std::cmp::Ordering::Greater => to_ring.add_points(from_ring.len() - to_ring.len()),
            std::cmp::Ordering::Equal => {}
        }
        to_ring.rotate_to_match(&from_ring);

        tracing::debug!(
            "path interpolator: {} points per ring (max segment {})",
            from_ring.len(),
            max_segment_length
        );

        Ok(Self {
            from_data: from.to_string(),
            to_data: to.to_string(),
            from: from_ring,
            to: to_ring,
        })
    }

    /// Original data for the first outline
    pub fn from_data(&self) -> &str {
        &self.from_data
    }

    /// Original data for the second outline
    pub fn to_data(&self) -> &str {
        &self.to_data
    }

    /// Points per normalized ring
    pub fn point_count(&self) -> usize {
        self.from.len()
    }

    /// Intermediate ring points; `t` is clamped to [0, 1]
    pub fn points_at(&self, t: f32) -> Vec<Point> {
        self.from.lerp(&self.to, clamp_progress(t))
    }

    /// Path data at progress `t`
    ///
    /// Endpoints return the original path strings untouched, so a settled
    /// morph renders exactly the authored glyph.
    pub fn at(&self, t: f32) -> String {
        let t = clamp_progress(t);
        if t < ENDPOINT_EPSILON {
            return self.from_data.clone();
        }
        if 1.0 - t < ENDPOINT_EPSILON {
            return self.to_data.clone();
        }
        path_data(&self.from.lerp(&self.to, t))
    }
}

fn clamp_progress(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
