//! Ready-to-draw surface + center-line part pairs.
//!
//! Used for short decorations along a path (casing shoes, packers, valves,
//! measurement markers) where the caller only wants drawable parts in one
//! color and does not keep a generator around.

use serde::Serialize;

use super::error::PipeError;
use super::generator::{PipeGeometryConfig, PipeGeometryGenerator};
use super::mesh::{LineMesh, PipeMesh};
use super::Point3;

/// Ring resolution used for every convenience part.
pub const PART_CROSS_SECTION_VERTEX_COUNT: usize = 12;

pub const SURFACE_PART_NAME: &str = "pipe surface";
pub const CENTER_LINE_PART_NAME: &str = "pipe center line";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// How the renderer should draw a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartEffect {
    /// Lit, filled polygons, pushed back slightly so lines drawn on top win
    /// the depth test.
    Surface { polygon_offset: bool },
    /// Unlit lines.
    Mesh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PartGeometry {
    Surface(PipeMesh),
    Lines(LineMesh),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipePart {
    pub name: &'static str,
    pub geometry: PartGeometry,
    pub color: Color3,
    pub effect: PartEffect,
}

impl PipePart {
    fn surface(mesh: PipeMesh, color: Color3) -> Self {
        Self {
            name: SURFACE_PART_NAME,
            geometry: PartGeometry::Surface(mesh),
            color,
            effect: PartEffect::Surface { polygon_offset: true },
        }
    }

    fn center_line(line: LineMesh, color: Color3) -> Self {
        Self {
            name: CENTER_LINE_PART_NAME,
            geometry: PartGeometry::Lines(line),
            color,
            effect: PartEffect::Mesh,
        }
    }
}

fn part_generator(radius: f64) -> Result<PipeGeometryGenerator, PipeError> {
    PipeGeometryGenerator::with_config(PipeGeometryConfig {
        radius,
        cross_section_vertex_count: PART_CROSS_SECTION_VERTEX_COUNT,
        ..Default::default()
    })
}

/// Constant-radius pipe through `points` plus its center line.
///
/// A part is left out when its geometry is empty, so the result may hold
/// zero, one or two parts.
pub fn cylinder_with_center_line_parts(
    points: &[Point3],
    color: Color3,
    radius: f64,
) -> Result<Vec<PipePart>, PipeError> {
    let mut generator = part_generator(radius)?;
    generator.set_center_line(points)?;

    let mut parts = Vec::with_capacity(2);
    if let Some(mesh) = generator.build_surface()? {
        parts.push(PipePart::surface(mesh, color));
    }
    if let Some(line) = generator.build_center_line()? {
        parts.push(PipePart::center_line(line, color));
    }
    Ok(parts)
}

/// Tube through `points` with one radius per point, plus its center line.
pub fn tube_with_center_line_parts_and_variable_width(
    points: &[Point3],
    radii: &[f64],
    color: Color3,
) -> Result<Vec<PipePart>, PipeError> {
    let mut generator = part_generator(1.0)?;
    generator.set_center_line(points)?;

    let mut parts = Vec::with_capacity(2);
    if let Some(mesh) = generator.build_variable_radius_surface(radii)? {
        parts.push(PipePart::surface(mesh, color));
    }
    if let Some(line) = generator.build_center_line()? {
        parts.push(PipePart::center_line(line, color));
    }
    Ok(parts)
}
