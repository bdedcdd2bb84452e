mod bend_filter;
mod circle;
mod clip;
mod core;
mod diagnostics;
mod error;
mod extrusion;
mod frame;
mod generator;
mod mesh;
mod metrics;
mod parts;
mod texture;
mod variable_tube;

pub use bend_filter::{BendFilterOptions, FilteredCenterLine, filter_center_line};
pub use circle::{build_ring, build_ring_in_frame};
pub use clip::{ClippedPolyline, clip_polyline_start_above_z};
pub use core::{Plane, Point3, Tolerance, Vec3};
pub use diagnostics::PipeDiagnostics;
pub use error::PipeError;
pub use extrusion::extrude_pipe;
pub use frame::OrthonormalFrame;
pub use generator::{
    MAX_CROSS_SECTION_VERTEX_COUNT, MAX_RADIUS, PipeGeometryConfig, PipeGeometryGenerator,
    STRAIGHT_BEND_ANGLE_DEGREES,
};
pub use mesh::{LineMesh, PipeMesh};
pub use metrics::{PipeMetrics, PipeTimingReport, TimingBucket};
pub use parts::{
    CENTER_LINE_PART_NAME, Color3, PART_CROSS_SECTION_VERTEX_COUNT, PartEffect, PartGeometry,
    PipePart, SURFACE_PART_NAME, cylinder_with_center_line_parts,
    tube_with_center_line_parts_and_variable_width,
};
pub use texture::{LinearScalarMapper, ScalarMapper, UNDEFINED_TEXTURE_COORD};
pub use variable_tube::extrude_variable_radius_tube;

#[cfg(test)]
mod tests;
