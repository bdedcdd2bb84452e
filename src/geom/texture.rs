//! Scalar to texture-coordinate mapping used for result coloring.
//!
//! The renderer looks up colors in a 1D legend texture: `u` runs along the
//! legend, `v = 0.5` samples the legend row and `v = 1.0` samples the
//! "undefined value" row.

/// Maps a per-segment result value to a texture coordinate.
pub trait ScalarMapper {
    fn map_to_texture_coord(&self, value: f64) -> [f32; 2];
}

impl<F> ScalarMapper for F
where
    F: Fn(f64) -> [f32; 2],
{
    fn map_to_texture_coord(&self, value: f64) -> [f32; 2] {
        self(value)
    }
}

pub const UNDEFINED_TEXTURE_COORD: [f32; 2] = [0.5, 1.0];

/// Linear legend between `min` and `max`, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScalarMapper {
    pub min: f64,
    pub max: f64,
}

impl LinearScalarMapper {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range spanning all finite `values`; `None` if there are none.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut finite = values.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;
        let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }
}

impl ScalarMapper for LinearScalarMapper {
    fn map_to_texture_coord(&self, value: f64) -> [f32; 2] {
        if !value.is_finite() {
            return UNDEFINED_TEXTURE_COORD;
        }
        let span = self.max - self.min;
        let u = if span.abs() <= f64::EPSILON || !span.is_finite() {
            0.5
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        };
        [u as f32, 0.5]
    }
}
