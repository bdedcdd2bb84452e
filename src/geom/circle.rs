//! Circular cross-section ("collar") builder.

use super::frame::OrthonormalFrame;
use super::{Point3, Vec3};

/// Build one ring of `count` points around `center`.
///
/// `y_dir` and `z_dir` must be unit length and mutually orthogonal; the ring
/// starts at `center + radius * y_dir` and winds in the direction of
/// `y_dir × z_dir`. A radius of zero yields `count` copies of `center`.
#[must_use]
pub fn build_ring(radius: f64, count: usize, center: Point3, y_dir: Vec3, z_dir: Vec3) -> Vec<Point3> {
    let delta = 2.0 * std::f64::consts::PI / count as f64;

    (0..count)
        .map(|i| {
            let angle = delta * i as f64;
            let dir = y_dir.mul_scalar(angle.cos()).add(z_dir.mul_scalar(angle.sin()));
            let dir = dir.normalized().unwrap_or(dir);
            center.add_vec(dir.mul_scalar(radius))
        })
        .collect()
}

/// Build a ring in the cross-section plane of `frame`.
#[must_use]
pub fn build_ring_in_frame(radius: f64, count: usize, center: Point3, frame: &OrthonormalFrame) -> Vec<Point3> {
    build_ring(radius, count, center, frame.y_dir(), frame.z_dir())
}
