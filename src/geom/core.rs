use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Narrow to single precision for render buffers.
    #[must_use]
    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// A unit vector perpendicular to `self`.
    ///
    /// The cross product is taken against the coordinate axis along which
    /// `self` has its smallest component, so the result is stable for a given
    /// input. Returns `None` for a zero or non-finite vector.
    #[must_use]
    pub fn perpendicular_vector(self) -> Option<Self> {
        let a = self.abs();
        let axis = if a.x <= a.y && a.x <= a.z {
            Self::X
        } else if a.y <= a.z {
            Self::Y
        } else {
            Self::Z
        };
        self.cross(axis).normalized()
    }

    /// Component of `self` orthogonal to the unit vector `axis`.
    #[must_use]
    pub fn reject_from(self, axis: Self) -> Self {
        self.sub(axis.mul_scalar(self.dot(axis)))
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub const fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    #[must_use]
    pub const fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub const fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn add_vec(self, v: Vec3) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    #[must_use]
    pub const fn sub_vec(self, v: Vec3) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }

    #[must_use]
    pub const fn sub_point(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    /// Linear interpolation between two points.
    /// Returns `self * (1 - t) + rhs * t`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.sub_point(other).length()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        self.add_vec(rhs)
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Self;
    fn sub(self, rhs: Vec3) -> Self::Output {
        self.sub_vec(rhs)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_point(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plane
// ─────────────────────────────────────────────────────────────────────────────

/// An infinite plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vec3,
}

impl Plane {
    /// Returns `None` when `normal` cannot be normalized.
    #[must_use]
    pub fn from_point_and_normal(origin: Point3, normal: Vec3) -> Option<Self> {
        let normal = normal.normalized()?;
        Some(Self { origin, normal })
    }

    /// Signed distance from the plane, positive on the side `normal` points to.
    #[must_use]
    pub fn signed_distance(self, p: Point3) -> f64 {
        p.sub_point(self.origin).dot(self.normal)
    }

    /// Intersect the half-line `start + t * direction`, `t >= 0`, with the plane.
    ///
    /// Returns `None` when the ray points away from the plane or runs parallel
    /// to it.
    #[must_use]
    pub fn intersect_ray(self, start: Point3, direction: Vec3, tol: Tolerance) -> Option<Point3> {
        let denom = self.normal.dot(direction);
        if !denom.is_finite() || denom.abs() <= tol.eps {
            return None;
        }
        let t = self.origin.sub_point(start).dot(self.normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(start.add_vec(direction.mul_scalar(t)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for geometric operations.
///
/// - `Tolerance::DEFAULT` - General geometry comparisons (1e-9)
/// - `Tolerance::ZERO_LENGTH` - Detecting degenerate/zero-length vectors (1e-12)
/// - `Tolerance::PIPE_POINT` - Coincident center-line points (1e-4, compared squared)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Tolerance for detecting zero-length/degenerate vectors and edges (1e-12).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-12 };

    /// Distance under which two pipe center-line points count as the same point.
    pub const PIPE_POINT: Self = Self { eps: 1e-4 };

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
