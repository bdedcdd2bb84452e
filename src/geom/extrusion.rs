//! Fixed-radius mitered extrusion along a (filtered) center line.
//!
//! The first ring is laid out perpendicular to the first usable segment.
//! Every following ring is obtained by sliding the previous ring along the
//! segment direction until it hits the miter plane at the next vertex, so the
//! tube stays a perfect cylinder between vertices and the joints close
//! without gaps.

use super::circle::build_ring_in_frame;
use super::error::PipeError;
use super::frame::OrthonormalFrame;
use super::mesh::PipeMesh;
use super::{Plane, Point3, Tolerance, Vec3};

/// Squared length under which a segment has no usable direction.
const DEGENERATE_SEGMENT_LENGTH_SQ: f64 = Tolerance::ZERO_LENGTH.eps * Tolerance::ZERO_LENGTH.eps;

/// Rings plus per-segment, per-node normals ready for quad assembly.
///
/// `normals[k][i]` is used for both corners of node `i` on the quads between
/// ring `k` and ring `k + 1`.
#[derive(Debug, Clone, Default)]
pub(crate) struct RingSweep {
    pub rings: Vec<Vec<Point3>>,
    pub normals: Vec<Vec<Vec3>>,
}

impl RingSweep {
    fn with_capacity(rings: usize) -> Self {
        Self {
            rings: Vec::with_capacity(rings),
            normals: Vec::with_capacity(rings.saturating_sub(1)),
        }
    }
}

/// Extrude a constant-radius tube through `points`.
///
/// Returns `Ok(None)` for fewer than two points or when no segment has a
/// direction. Vertex count of the result is `4 * count * (points.len() - 1)`.
pub fn extrude_pipe(
    radius: f64,
    cross_section_vertex_count: usize,
    points: &[Point3],
) -> Result<Option<PipeMesh>, PipeError> {
    let Some(sweep) = sweep_mitered_rings(radius, cross_section_vertex_count, points)? else {
        return Ok(None);
    };
    if sweep.rings.len() < 2 {
        return Ok(None);
    }

    let mesh = assemble_quads(&sweep);
    log::debug!(
        "extruded pipe: {} rings x {} nodes -> {} quads",
        sweep.rings.len(),
        cross_section_vertex_count,
        mesh.quad_count()
    );
    Ok(Some(mesh))
}

pub(crate) fn segment_direction(points: &[Point3], segment: usize) -> Option<Vec3> {
    let delta = points[segment + 1].sub_point(points[segment]);
    if delta.length_squared() <= DEGENERATE_SEGMENT_LENGTH_SQ {
        return None;
    }
    delta.normalized()
}

/// Unit normal of the plane bisecting `incoming` and `outgoing`.
pub(crate) fn miter_normal(incoming: Vec3, outgoing: Vec3, vertex: usize) -> Result<Vec3, PipeError> {
    let sum = incoming.add(outgoing);
    if sum.length() <= Tolerance::DEFAULT.eps {
        return Err(PipeError::DegenerateMiter { segment: vertex });
    }
    sum.normalized().ok_or(PipeError::DegenerateMiter { segment: vertex })
}

/// Slide `point` along `direction` (either way) onto `plane`.
pub(crate) fn project_onto_miter(
    plane: Plane,
    point: Point3,
    direction: Vec3,
    vertex: usize,
    node: usize,
) -> Result<Point3, PipeError> {
    let tol = Tolerance::ZERO_LENGTH;
    plane
        .intersect_ray(point, direction, tol)
        .or_else(|| plane.intersect_ray(point, direction.neg(), tol))
        .ok_or(PipeError::ParallelMiterRay { segment: vertex, node })
}

fn sweep_mitered_rings(
    radius: f64,
    count: usize,
    points: &[Point3],
) -> Result<Option<RingSweep>, PipeError> {
    if points.len() < 2 {
        return Ok(None);
    }
    let last_segment = points.len() - 2;

    let Some(first_dir) = (0..=last_segment).find_map(|s| segment_direction(points, s)) else {
        return Ok(None);
    };
    let Some(frame) = OrthonormalFrame::from_tangent(first_dir) else {
        return Ok(None);
    };

    let mut sweep = RingSweep::with_capacity(points.len());
    sweep.rings.push(build_ring_in_frame(radius, count, points[0], &frame));

    let mut last_valid_dir = first_dir;
    for vertex in 1..points.len() {
        let incoming = segment_direction(points, vertex - 1).unwrap_or(last_valid_dir);
        last_valid_dir = incoming;
        let outgoing = if vertex <= last_segment {
            segment_direction(points, vertex).unwrap_or(incoming)
        } else {
            incoming
        };

        let normal = miter_normal(incoming, outgoing, vertex)?;
        let plane = Plane { origin: points[vertex], normal };

        let prev_center = points[vertex - 1];
        let prev_ring = &sweep.rings[vertex - 1];
        let segment_normals = radial_normals(prev_ring, prev_center, incoming);

        let next_ring = prev_ring
            .iter()
            .enumerate()
            .map(|(node, &p)| project_onto_miter(plane, p, incoming, vertex, node))
            .collect::<Result<Vec<_>, _>>()?;

        sweep.normals.push(segment_normals);
        sweep.rings.push(next_ring);
    }

    Ok(Some(sweep))
}

/// Ring offsets from `center`, flattened into the plane orthogonal to `axis`.
fn radial_normals(ring: &[Point3], center: Point3, axis: Vec3) -> Vec<Vec3> {
    let count = ring.len();
    ring.iter()
        .enumerate()
        .map(|(i, p)| {
            p.sub_point(center)
                .reject_from(axis)
                .normalized()
                .unwrap_or_else(|| fallback_radial(axis, i, count))
        })
        .collect()
}

/// Radial direction of node `i` in the canonical frame around `axis`, used
/// when the ring has collapsed onto the center line.
pub(crate) fn fallback_radial(axis: Vec3, node: usize, count: usize) -> Vec3 {
    let Some(frame) = OrthonormalFrame::from_tangent(axis) else {
        return Vec3::X;
    };
    let angle = 2.0 * std::f64::consts::PI * node as f64 / count.max(1) as f64;
    frame.y_dir().mul_scalar(angle.cos()).add(frame.z_dir().mul_scalar(angle.sin()))
}

/// Emit one quad per (segment, node), wrapping the last node back to 0.
pub(crate) fn assemble_quads(sweep: &RingSweep) -> PipeMesh {
    let segments = sweep.rings.len().saturating_sub(1);
    let count = sweep.rings.first().map_or(0, Vec::len);

    let segment_quads = |seg: usize| -> PipeMesh {
        let ring = &sweep.rings[seg];
        let next = &sweep.rings[seg + 1];
        let normals = &sweep.normals[seg];

        let mut quads = PipeMesh::with_quad_capacity(count);
        for node in 0..count {
            let node_next = (node + 1) % count;
            let n0 = normals[node].to_f32_array();
            let n1 = normals[node_next].to_f32_array();
            quads.push_quad(
                [
                    ring[node].to_f32_array(),
                    ring[node_next].to_f32_array(),
                    next[node_next].to_f32_array(),
                    next[node].to_f32_array(),
                ],
                [n0, n1, n1, n0],
            );
        }
        quads
    };

    #[cfg(feature = "parallel")]
    let chunks: Vec<PipeMesh> = {
        use rayon::prelude::*;
        (0..segments).into_par_iter().map(segment_quads).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let chunks: Vec<PipeMesh> = (0..segments).map(segment_quads).collect();

    let mut mesh = PipeMesh::with_quad_capacity(segments * count);
    for mut chunk in chunks {
        mesh.append(&mut chunk);
    }
    mesh
}
