//! Orthonormal cross-section frames.
//!
//! A pipe ring is laid out in the plane spanned by `y_dir` and `z_dir` of an
//! [`OrthonormalFrame`]. The frame can only be obtained through its factory
//! functions, which normalize and orthogonalize the inputs, so a ring built
//! from a frame always winds counter-clockwise around `tangent`.

use super::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthonormalFrame {
    tangent: Vec3,
    y_dir: Vec3,
    z_dir: Vec3,
}

impl OrthonormalFrame {
    /// Build a frame around `tangent` with an arbitrary but deterministic
    /// in-plane basis taken from [`Vec3::perpendicular_vector`].
    ///
    /// Returns `None` if `tangent` is zero or not finite.
    #[must_use]
    pub fn from_tangent(tangent: Vec3) -> Option<Self> {
        let tangent = tangent.normalized()?;
        let y_dir = tangent.perpendicular_vector()?;
        Self::assemble(tangent, y_dir)
    }

    /// Build a frame around `tangent` whose `y_dir` is the part of
    /// `y_hint` perpendicular to the tangent.
    ///
    /// Returns `None` if `tangent` is degenerate or `y_hint` is parallel to it.
    #[must_use]
    pub fn from_tangent_and_hint(tangent: Vec3, y_hint: Vec3) -> Option<Self> {
        let tangent = tangent.normalized()?;
        let y_dir = y_hint.reject_from(tangent).normalized()?;
        Self::assemble(tangent, y_dir)
    }

    fn assemble(tangent: Vec3, y_dir: Vec3) -> Option<Self> {
        let z_dir = tangent.cross(y_dir).normalized()?;
        Some(Self { tangent, y_dir, z_dir })
    }

    #[must_use]
    pub const fn tangent(&self) -> Vec3 {
        self.tangent
    }

    #[must_use]
    pub const fn y_dir(&self) -> Vec3 {
        self.y_dir
    }

    #[must_use]
    pub const fn z_dir(&self) -> Vec3 {
        self.z_dir
    }
}
