//! Variable-radius tube builder.
//!
//! Every center-line point gets its own circle with its own radius, laid out
//! in a frame rebuilt from the local direction and then slid onto the miter
//! plane at that point. Consecutive points that coincide give a flat annulus
//! step, which is how shoes, packers and markers get their shoulders.
//!
//! No bend filtering is done here; callers pass short, well-formed shapes.

use super::circle::build_ring_in_frame;
use super::error::PipeError;
use super::extrusion::{RingSweep, assemble_quads, miter_normal, project_onto_miter, segment_direction};
use super::frame::OrthonormalFrame;
use super::mesh::PipeMesh;
use super::{Plane, Point3, Vec3};

/// Extrude a tube through `points` with one radius per point.
///
/// Returns `Ok(None)` for fewer than two points or when every point
/// coincides.
pub fn extrude_variable_radius_tube(
    radii: &[f64],
    cross_section_vertex_count: usize,
    points: &[Point3],
) -> Result<Option<PipeMesh>, PipeError> {
    if radii.len() != points.len() {
        return Err(PipeError::RadiusCountMismatch {
            points: points.len(),
            radii: radii.len(),
        });
    }
    if let Some(&bad) = radii.iter().find(|r| !r.is_finite() || **r < 0.0) {
        return Err(PipeError::InvalidRadius(bad));
    }
    if points.len() < 2 {
        return Ok(None);
    }

    let last_segment = points.len() - 2;
    let Some(first_dir) = (0..=last_segment).find_map(|s| segment_direction(points, s)) else {
        return Ok(None);
    };

    let count = cross_section_vertex_count;
    let mut rings: Vec<Vec<Point3>> = Vec::with_capacity(points.len());
    let mut frames: Vec<OrthonormalFrame> = Vec::with_capacity(points.len());
    let mut last_valid_dir = first_dir;
    let mut prev_frame: Option<OrthonormalFrame> = None;

    for (vertex, (&center, &radius)) in points.iter().zip(radii).enumerate() {
        let incoming = if vertex == 0 {
            first_dir
        } else {
            segment_direction(points, vertex - 1).unwrap_or(last_valid_dir)
        };
        last_valid_dir = incoming;
        let outgoing = if vertex <= last_segment {
            segment_direction(points, vertex).unwrap_or(incoming)
        } else {
            incoming
        };

        let frame = prev_frame
            .and_then(|prev| OrthonormalFrame::from_tangent_and_hint(outgoing, prev.y_dir()))
            .or_else(|| OrthonormalFrame::from_tangent(outgoing))
            .ok_or(PipeError::DegenerateMiter { segment: vertex })?;

        let normal = miter_normal(incoming, outgoing, vertex)?;
        let plane = Plane { origin: center, normal };

        let ring = build_ring_in_frame(radius, count, center, &frame)
            .into_iter()
            .enumerate()
            .map(|(node, p)| project_onto_miter(plane, p, outgoing, vertex, node))
            .collect::<Result<Vec<_>, _>>()?;

        rings.push(ring);
        frames.push(frame);
        prev_frame = Some(frame);
    }

    let normals = (0..rings.len() - 1)
        .map(|k| surface_normals(&rings[k], &rings[k + 1], &frames[k]))
        .collect();
    let sweep = RingSweep { rings, normals };
    let mesh = assemble_quads(&sweep);

    log::debug!(
        "extruded variable tube: {} rings x {} nodes -> {} quads",
        sweep.rings.len(),
        count,
        mesh.quad_count()
    );
    Ok(Some(mesh))
}

/// `normalize(along × around)` per node, falling back to the frame's radial
/// direction where the quad has collapsed.
fn surface_normals(ring: &[Point3], next: &[Point3], frame: &OrthonormalFrame) -> Vec<Vec3> {
    let count = ring.len();
    (0..count)
        .map(|i| {
            let prev = (i + count - 1) % count;
            let along = next[i].sub_point(ring[i]);
            let around = ring[prev].sub_point(ring[i]);
            along.cross(around).normalized().unwrap_or_else(|| radial(frame, i, count))
        })
        .collect()
}

fn radial(frame: &OrthonormalFrame, node: usize, count: usize) -> Vec3 {
    let angle = 2.0 * std::f64::consts::PI * node as f64 / count as f64;
    frame.y_dir().mul_scalar(angle.cos()).add(frame.z_dir().mul_scalar(angle.sin()))
}
