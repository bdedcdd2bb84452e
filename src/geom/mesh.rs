use serde::Serialize;

/// Quad-organized pipe surface.
///
/// Every four consecutive positions form one quad, wound counter-clockwise
/// when viewed from outside the pipe. `normals` is parallel to `positions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PipeMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
}

impl PipeMesh {
    pub const VERTICES_PER_QUAD: usize = 4;

    #[must_use]
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            positions: Vec::with_capacity(quads * Self::VERTICES_PER_QUAD),
            normals: Vec::with_capacity(quads * Self::VERTICES_PER_QUAD),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.positions.len() / Self::VERTICES_PER_QUAD
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.quad_count() * 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if any position or normal contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .chain(self.normals.iter())
            .any(|p| p.iter().any(|c| !c.is_finite()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.positions.len() % Self::VERTICES_PER_QUAD != 0 {
            return Err("pipe mesh positions are not a quad list (len % 4 != 0)".to_string());
        }
        if self.normals.len() != self.positions.len() {
            return Err("pipe mesh normals do not match vertex count".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("pipe mesh has invalid coordinates (NaN/Inf)".to_string());
        }
        Ok(())
    }

    /// Split every quad `(i0, i1, i2, i3)` into `[i0, i1, i2]` and `[i0, i2, i3]`.
    ///
    /// Triangle `t` belongs to quad `t / 2`.
    #[must_use]
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.quad_count() * 6);
        for quad in 0..self.quad_count() {
            let i0 = (quad * Self::VERTICES_PER_QUAD) as u32;
            let (i1, i2, i3) = (i0 + 1, i0 + 2, i0 + 3);
            indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
        }
        indices
    }

    /// Position buffer as `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    /// Normal buffer as `[nx0, ny0, nz0, ...]`.
    #[must_use]
    pub fn normals_flat(&self) -> &[f32] {
        self.normals.as_flattened()
    }

    pub(crate) fn push_quad(&mut self, corners: [[f32; 3]; 4], normals: [[f32; 3]; 4]) {
        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&normals);
    }

    pub(crate) fn append(&mut self, other: &mut Self) {
        self.positions.append(&mut other.positions);
        self.normals.append(&mut other.normals);
    }
}

/// Line-list rendering of a center line: two endpoints per segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LineMesh {
    pub positions: Vec<[f32; 3]>,
}

impl LineMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// `[0, 1, 2, 3, ...]`: every pair of indices is one line segment.
    #[must_use]
    pub fn line_indices(&self) -> Vec<u32> {
        (0..self.positions.len() as u32).collect()
    }

    #[must_use]
    pub fn positions_flat(&self) -> &[f32] {
        self.positions.as_flattened()
    }
}
