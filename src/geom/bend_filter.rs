//! Center-line bend filter.
//!
//! Prepares a raw center line for mitered extrusion:
//! - consecutive points closer than the tolerance are collapsed,
//! - at every turn sharper than the minimum bend angle two extra points are
//!   inserted on either side of the corner, offset along the bisector by a
//!   tiny fraction of the pipe radius.
//!
//! The result keeps, for every filtered segment, the index of the original
//! segment it came from so picks and per-segment colors can be mapped back.

use super::{Point3, Tolerance, Vec3};

/// Added to the bend offset so the inserted points never coincide with the
/// corner, even for a zero radius.
const BEND_RADIUS_EPSILON: f64 = 1.0e-30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendFilterOptions {
    /// Squared distance under which two consecutive points are treated as one.
    pub square_distance_tolerance: f64,
    /// Turns whose included angle is below this value get bend points.
    /// 180 means every non-straight corner is treated as a bend.
    pub minimum_bend_angle_degrees: f64,
    /// Offset of the inserted bend points, as a fraction of `radius`.
    pub bend_scaling_factor: f64,
    pub radius: f64,
}

impl Default for BendFilterOptions {
    fn default() -> Self {
        Self {
            square_distance_tolerance: Tolerance::PIPE_POINT.eps_squared(),
            minimum_bend_angle_degrees: 80.0,
            bend_scaling_factor: 1.0e-5,
            radius: 1.0,
        }
    }
}

/// Bend-processed, duplicate-collapsed center line.
///
/// `segment_index_map[i]` is the original segment index for the filtered
/// segment running from `points[i]` to `points[i + 1]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredCenterLine {
    pub points: Vec<Point3>,
    pub segment_index_map: Vec<usize>,
    /// Number of corners that received bend points.
    pub bend_count: usize,
    /// Number of original points that did not make it into `points`.
    pub dropped_point_count: usize,
}

impl FilteredCenterLine {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_index_map.len()
    }

    #[must_use]
    pub fn original_segment_index(&self, filtered_segment: usize) -> Option<usize> {
        self.segment_index_map.get(filtered_segment).copied()
    }
}

/// Run the bend filter over `points`.
///
/// Returns `None` when there are fewer than two points or when no segment is
/// longer than the tolerance.
#[must_use]
pub fn filter_center_line(points: &[Point3], options: BendFilterOptions) -> Option<FilteredCenterLine> {
    if points.len() < 2 {
        return None;
    }

    let tol_sq = options.square_distance_tolerance;
    let last_idx = points.len() - 1;

    let first_valid = (0..last_idx)
        .find(|&i| points[i + 1].sub_point(points[i]).length_squared() > tol_sq)?;

    let mut last_valid_dir = points[first_valid + 1].sub_point(points[first_valid]).normalized()?;
    let mut last_valid_segment = first_valid;

    let cos_min_bend = options.minimum_bend_angle_degrees.to_radians().cos();
    let bend_radius = options.bend_scaling_factor * options.radius + BEND_RADIUS_EPSILON;

    let mut filtered = FilteredCenterLine {
        points: Vec::with_capacity(points.len() + 2),
        segment_index_map: Vec::with_capacity(points.len() + 1),
        bend_count: 0,
        dropped_point_count: first_valid,
    };
    filtered.points.push(points[first_valid]);
    filtered.segment_index_map.push(first_valid);

    for idx in (first_valid + 1)..last_idx {
        let a = points[idx - 1];
        let b = points[idx];
        let c = points[idx + 1];

        let ab = b.sub_point(a);
        if ab.length_squared() > tol_sq {
            if let Some(dir) = ab.normalized() {
                last_valid_dir = dir;
                last_valid_segment = idx - 1;
            }
        }

        // Hold back B until it starts a segment with length.
        let bc = c.sub_point(b);
        if bc.length_squared() < tol_sq {
            filtered.dropped_point_count += 1;
            continue;
        }
        let Some(bc_dir) = bc.normalized() else {
            filtered.dropped_point_count += 1;
            continue;
        };

        if last_valid_dir.dot(bc_dir.neg()) > cos_min_bend {
            let bisector = bend_direction(last_valid_dir, bc_dir);
            let offset = bisector.mul_scalar(bend_radius);

            filtered.points.push(b.sub_vec(offset));
            filtered.segment_index_map.push(last_valid_segment);
            filtered.points.push(b);
            filtered.segment_index_map.push(idx);
            filtered.points.push(b.add_vec(offset));
            filtered.segment_index_map.push(idx);
            filtered.bend_count += 1;
        } else {
            filtered.points.push(b);
            filtered.segment_index_map.push(idx);
        }
    }

    filtered.points.push(points[last_idx]);

    debug_assert_eq!(filtered.points.len() - 1, filtered.segment_index_map.len());
    log::debug!(
        "bend filter: {} -> {} points ({} bends, {} dropped)",
        points.len(),
        filtered.points.len(),
        filtered.bend_count,
        filtered.dropped_point_count
    );

    Some(filtered)
}

/// Direction halfway between `incoming` and `outgoing`; falls back to any
/// perpendicular of `incoming` for an exact reversal.
fn bend_direction(incoming: Vec3, outgoing: Vec3) -> Vec3 {
    let sum = incoming.add(outgoing);
    if sum.length() > Tolerance::ZERO_LENGTH.eps {
        if let Some(dir) = sum.normalized() {
            return dir;
        }
    }
    incoming.perpendicular_vector().unwrap_or(Vec3::X)
}
