//! Clip the start of a center line at a height limit.
//!
//! Paths usually start far above the region of interest. Everything above
//! `max_z` is cut away and replaced by the crossing point, and the caller
//! keeps the index of the first visible original segment so picks on the
//! clipped pipe still report indices into the full path.

use super::Point3;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClippedPolyline {
    pub points: Vec<Point3>,
    /// XY length of the removed part, up to the crossing point.
    pub horizontal_length_to_clip_point: f64,
    /// Original segment that now starts the clipped line; `None` when
    /// nothing is below `max_z`.
    pub first_visible_segment_index: Option<usize>,
}

/// Remove the leading part of `points` that lies above `max_z` (z is up).
#[must_use]
pub fn clip_polyline_start_above_z(points: &[Point3], max_z: f64) -> ClippedPolyline {
    let Some(first_below) = points.iter().position(|p| p.z < max_z) else {
        return ClippedPolyline::default();
    };

    if first_below == 0 {
        return ClippedPolyline {
            points: points.to_vec(),
            horizontal_length_to_clip_point: 0.0,
            first_visible_segment_index: Some(0),
        };
    }

    let mut horizontal_length: f64 = points[..first_below]
        .windows(2)
        .map(|pair| horizontal_distance(pair[0], pair[1]))
        .sum();

    let above = points[first_below - 1];
    let below = points[first_below];
    // above.z >= max_z > below.z, so the denominator is positive.
    let t = (above.z - max_z) / (above.z - below.z);
    let mut crossing = above.lerp(below, t);
    crossing.z = max_z;
    horizontal_length += horizontal_distance(above, crossing);

    let mut clipped = Vec::with_capacity(points.len() - first_below + 1);
    clipped.push(crossing);
    clipped.extend_from_slice(&points[first_below..]);

    log::debug!(
        "clipped {} of {} center line points above z = {max_z}",
        first_below,
        points.len()
    );

    ClippedPolyline {
        points: clipped,
        horizontal_length_to_clip_point: horizontal_length,
        first_visible_segment_index: Some(first_below - 1),
    }
}

fn horizontal_distance(a: Point3, b: Point3) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}
