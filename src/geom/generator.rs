//! Pipe geometry generator.
//!
//! Owns a copy of the center line and the configuration, and caches the
//! bend-filtered center line between builds. The cache is an explicit
//! two-state machine: every setter moves the generator to `Dirty`; the next
//! build (or [`PipeGeometryGenerator::update_filtered_center_line`]) reruns
//! the bend filter and moves it to `Clean`.

use super::bend_filter::{BendFilterOptions, FilteredCenterLine, filter_center_line};
use super::diagnostics::PipeDiagnostics;
use super::error::PipeError;
use super::extrusion::extrude_pipe;
use super::mesh::{LineMesh, PipeMesh};
use super::metrics::{PipeMetrics, TimingBucket};
use super::texture::ScalarMapper;
use super::variable_tube::extrude_variable_radius_tube;
use super::{Point3, Tolerance};

pub const MAX_RADIUS: f64 = 1.0e100;
pub const MAX_CROSS_SECTION_VERTEX_COUNT: usize = 1_000_000;
/// Minimum bend angle that turns every non-straight corner into a bend.
pub const STRAIGHT_BEND_ANGLE_DEGREES: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeGeometryConfig {
    pub radius: f64,
    /// Ring vertices; strictly between 2 and 1 000 000.
    pub cross_section_vertex_count: usize,
    pub minimum_bend_angle_degrees: f64,
    pub bend_scaling_factor: f64,
}

impl Default for PipeGeometryConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            cross_section_vertex_count: 8,
            minimum_bend_angle_degrees: 80.0,
            bend_scaling_factor: 1.0e-5,
        }
    }
}

impl PipeGeometryConfig {
    pub fn validate(&self) -> Result<(), PipeError> {
        validate_radius(self.radius)?;
        validate_cross_section_vertex_count(self.cross_section_vertex_count)?;
        validate_bend_angle(self.minimum_bend_angle_degrees)?;
        validate_bend_scaling_factor(self.bend_scaling_factor)
    }
}

impl From<&PipeGeometryConfig> for BendFilterOptions {
    fn from(config: &PipeGeometryConfig) -> Self {
        Self {
            square_distance_tolerance: Tolerance::PIPE_POINT.eps_squared(),
            minimum_bend_angle_degrees: config.minimum_bend_angle_degrees,
            bend_scaling_factor: config.bend_scaling_factor,
            radius: config.radius,
        }
    }
}

fn validate_radius(radius: f64) -> Result<(), PipeError> {
    if radius.is_finite() && (0.0..MAX_RADIUS).contains(&radius) {
        Ok(())
    } else {
        Err(PipeError::InvalidRadius(radius))
    }
}

fn validate_cross_section_vertex_count(count: usize) -> Result<(), PipeError> {
    if count > 2 && count < MAX_CROSS_SECTION_VERTEX_COUNT {
        Ok(())
    } else {
        Err(PipeError::InvalidCrossSectionVertexCount(count))
    }
}

fn validate_bend_angle(degrees: f64) -> Result<(), PipeError> {
    if degrees.is_finite() && (0.0..=STRAIGHT_BEND_ANGLE_DEGREES).contains(&degrees) {
        Ok(())
    } else {
        Err(PipeError::InvalidBendAngle(degrees))
    }
}

fn validate_bend_scaling_factor(factor: f64) -> Result<(), PipeError> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(PipeError::InvalidBendScalingFactor(factor))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DerivedState {
    Dirty,
    /// `None` when the center line has no usable segment.
    Clean(Option<FilteredCenterLine>),
}

#[derive(Debug, Clone)]
pub struct PipeGeometryGenerator {
    config: PipeGeometryConfig,
    center_line: Vec<Point3>,
    first_visible_segment_index: usize,
    state: DerivedState,
    diagnostics: PipeDiagnostics,
    metrics: PipeMetrics,
}

impl Default for PipeGeometryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeGeometryGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipeGeometryConfig::default(),
            center_line: Vec::new(),
            first_visible_segment_index: 0,
            state: DerivedState::Dirty,
            diagnostics: PipeDiagnostics::default(),
            metrics: PipeMetrics::default(),
        }
    }

    pub fn with_config(config: PipeGeometryConfig) -> Result<Self, PipeError> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    #[must_use]
    pub fn config(&self) -> &PipeGeometryConfig {
        &self.config
    }

    #[must_use]
    pub fn center_line(&self) -> &[Point3] {
        &self.center_line
    }

    #[must_use]
    pub fn first_visible_segment_index(&self) -> usize {
        self.first_visible_segment_index
    }

    #[must_use]
    pub fn diagnostics(&self) -> &PipeDiagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        matches!(self.state, DerivedState::Dirty)
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<(), PipeError> {
        validate_radius(radius)?;
        self.config.radius = radius;
        self.invalidate();
        Ok(())
    }

    pub fn set_cross_section_vertex_count(&mut self, count: usize) -> Result<(), PipeError> {
        validate_cross_section_vertex_count(count)?;
        self.config.cross_section_vertex_count = count;
        self.invalidate();
        Ok(())
    }

    pub fn set_minimum_bend_angle(&mut self, degrees: f64) -> Result<(), PipeError> {
        validate_bend_angle(degrees)?;
        self.config.minimum_bend_angle_degrees = degrees;
        self.invalidate();
        Ok(())
    }

    pub fn set_bend_scaling_factor(&mut self, factor: f64) -> Result<(), PipeError> {
        validate_bend_scaling_factor(factor)?;
        self.config.bend_scaling_factor = factor;
        self.invalidate();
        Ok(())
    }

    /// Offset added to every reported segment index, for center lines that
    /// were clipped from a longer path. Does not touch the filtered line.
    pub fn set_first_visible_segment_index(&mut self, index: usize) {
        self.first_visible_segment_index = index;
    }

    /// Copy `points` in as the new center line.
    pub fn set_center_line(&mut self, points: &[Point3]) -> Result<(), PipeError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PipeError::NonFiniteCenterLine { index });
        }
        self.center_line.clear();
        self.center_line.extend_from_slice(points);
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.state = DerivedState::Dirty;
    }

    /// Rerun the bend filter if dirty and return the filtered line.
    ///
    /// `None` means there is nothing to extrude.
    pub fn update_filtered_center_line(&mut self) -> Option<&FilteredCenterLine> {
        self.ensure_clean();
        self.filtered_center_line()
    }

    /// Cached filtered line; always `None` while dirty.
    #[must_use]
    pub fn filtered_center_line(&self) -> Option<&FilteredCenterLine> {
        match &self.state {
            DerivedState::Clean(filtered) => filtered.as_ref(),
            DerivedState::Dirty => None,
        }
    }

    fn ensure_clean(&mut self) {
        if !self.is_dirty() {
            return;
        }

        let options = BendFilterOptions::from(&self.config);
        let center_line = &self.center_line;
        let filtered = self
            .metrics
            .time(TimingBucket::BendFilter, || filter_center_line(center_line, options));

        let mut diagnostics = PipeDiagnostics {
            input_point_count: self.center_line.len(),
            ..Default::default()
        };
        match &filtered {
            Some(line) => {
                diagnostics.filtered_point_count = line.points.len();
                diagnostics.dropped_point_count = line.dropped_point_count;
                diagnostics.bend_count = line.bend_count;
            }
            None if self.center_line.len() >= 2 => {
                diagnostics.dropped_point_count = self.center_line.len();
                diagnostics.add_warning("center line has no segment longer than the point tolerance");
            }
            None => {}
        }
        log::debug!("pipe generator refiltered: {}", diagnostics.summary());

        self.diagnostics = diagnostics;
        self.state = DerivedState::Clean(filtered);
    }

    /// Mitered surface of the filtered center line.
    ///
    /// `Ok(None)` when the radius is zero or there is nothing to extrude.
    pub fn build_surface(&mut self) -> Result<Option<PipeMesh>, PipeError> {
        if self.config.radius == 0.0 {
            self.clear_surface_diagnostics();
            return Ok(None);
        }
        self.metrics.begin();
        self.ensure_clean();

        let DerivedState::Clean(Some(filtered)) = &self.state else {
            self.clear_surface_diagnostics();
            return Ok(None);
        };
        let radius = self.config.radius;
        let count = self.config.cross_section_vertex_count;
        let result = self
            .metrics
            .time(TimingBucket::Extrusion, || extrude_pipe(radius, count, &filtered.points));

        match &result {
            Ok(Some(mesh)) => {
                self.clear_surface_diagnostics();
                self.diagnostics.quad_count = mesh.quad_count();
                self.diagnostics.ring_count = mesh.quad_count() / count + 1;
            }
            Ok(None) => self.clear_surface_diagnostics(),
            Err(err) => {
                log::warn!("pipe surface not built: {err}");
                self.clear_surface_diagnostics();
                self.diagnostics.degenerate_geometry = true;
                self.diagnostics.add_warning(err.to_string());
            }
        }
        self.diagnostics.timing = self.metrics.end();

        result
    }

    /// Tube through the unfiltered center line with one radius per point.
    ///
    /// Uses the configured cross-section vertex count; the fixed radius and
    /// the bend filter settings play no part.
    pub fn build_variable_radius_surface(&mut self, radii: &[f64]) -> Result<Option<PipeMesh>, PipeError> {
        self.metrics.begin();
        let count = self.config.cross_section_vertex_count;
        let center_line = &self.center_line;
        let result = self.metrics.time(TimingBucket::VariableTube, || {
            extrude_variable_radius_tube(radii, count, center_line)
        });
        self.diagnostics.timing = self.metrics.end();
        result
    }

    /// Drop the surface counts and any degeneracy recorded by an earlier build.
    fn clear_surface_diagnostics(&mut self) {
        self.diagnostics.quad_count = 0;
        self.diagnostics.ring_count = 0;
        if self.diagnostics.degenerate_geometry {
            self.diagnostics.degenerate_geometry = false;
            // The degeneracy warning is always the last one pushed.
            self.diagnostics.warnings.pop();
        }
    }

    /// Line segments of the unfiltered center line, two vertices each.
    pub fn build_center_line(&mut self) -> Result<Option<LineMesh>, PipeError> {
        if self.center_line.len() < 2 {
            return Ok(None);
        }
        let center_line = &self.center_line;
        let line = self.metrics.time(TimingBucket::CenterLine, || LineMesh {
            positions: center_line
                .windows(2)
                .flat_map(|pair| [pair[0].to_f32_array(), pair[1].to_f32_array()])
                .collect(),
        });
        Ok(Some(line))
    }

    fn check_segment_values(&self, values: &[f64]) -> Result<(), PipeError> {
        let expected = self.center_line.len().saturating_sub(1);
        if values.len() == expected {
            Ok(())
        } else {
            Err(PipeError::ScalarCountMismatch { expected, actual: values.len() })
        }
    }

    /// One texture coordinate per surface vertex, taken from the value of
    /// the original segment each filtered segment came from.
    ///
    /// `values` must hold one entry per original center-line segment.
    pub fn compute_surface_texture_coordinates(
        &mut self,
        values: &[f64],
        mapper: &impl ScalarMapper,
    ) -> Result<Vec<[f32; 2]>, PipeError> {
        self.check_segment_values(values)?;
        self.ensure_clean();

        let DerivedState::Clean(Some(filtered)) = &self.state else {
            return Ok(Vec::new());
        };
        let per_segment: Vec<[f32; 2]> = filtered
            .segment_index_map
            .iter()
            .map(|&original| mapper.map_to_texture_coord(values[original]))
            .collect();
        let vertices_per_segment = self.config.cross_section_vertex_count * PipeMesh::VERTICES_PER_QUAD;

        Ok(self.metrics.time(TimingBucket::TextureCoordinates, || {
            expand_per_segment(&per_segment, vertices_per_segment)
        }))
    }

    /// Two texture coordinates per original segment, matching
    /// [`build_center_line`](Self::build_center_line).
    pub fn compute_center_line_texture_coordinates(
        &mut self,
        values: &[f64],
        mapper: &impl ScalarMapper,
    ) -> Result<Vec<[f32; 2]>, PipeError> {
        self.check_segment_values(values)?;
        let per_segment: Vec<[f32; 2]> = values.iter().map(|&v| mapper.map_to_texture_coord(v)).collect();
        Ok(self
            .metrics
            .time(TimingBucket::TextureCoordinates, || expand_per_segment(&per_segment, 2)))
    }

    /// Original segment index (plus the first visible segment offset) of a
    /// triangle in the surface built by [`build_surface`](Self::build_surface).
    ///
    /// Triangle `t` lies on quad `t / 2`; each filtered segment owns
    /// `2 * cross_section_vertex_count` triangles.
    pub fn segment_index_from_triangle_index(&mut self, triangle_index: usize) -> Option<usize> {
        if self.config.radius == 0.0 {
            return None;
        }
        self.ensure_clean();
        let filtered = self.filtered_center_line()?;
        let triangles_per_segment = self.config.cross_section_vertex_count * 2;
        let segment = triangle_index / triangles_per_segment;
        filtered
            .original_segment_index(segment)
            .map(|original| original + self.first_visible_segment_index)
    }
}

fn expand_per_segment(per_segment: &[[f32; 2]], repeat: usize) -> Vec<[f32; 2]> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        per_segment
            .par_iter()
            .flat_map_iter(|&tc| std::iter::repeat_n(tc, repeat))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        per_segment
            .iter()
            .flat_map(|&tc| std::iter::repeat_n(tc, repeat))
            .collect()
    }
}
