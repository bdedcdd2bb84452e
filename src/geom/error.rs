/// Failures reported by the pipe geometry builders.
///
/// "Nothing to draw" (too few points, all points coincident, zero radius) is
/// not an error; builders return `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipeError {
    #[error("radius must be finite and in [0, 1e100), got {0}")]
    InvalidRadius(f64),
    #[error("cross-section vertex count must be in (2, 1000000), got {0}")]
    InvalidCrossSectionVertexCount(usize),
    #[error("minimum bend angle must be finite and in [0, 180] degrees, got {0}")]
    InvalidBendAngle(f64),
    #[error("bend scaling factor must be finite and >= 0, got {0}")]
    InvalidBendScalingFactor(f64),
    #[error("center line point {index} is not finite")]
    NonFiniteCenterLine { index: usize },
    #[error("expected {expected} per-segment values, got {actual}")]
    ScalarCountMismatch { expected: usize, actual: usize },
    #[error("variable radius tube needs one radius per point ({points} points, {radii} radii)")]
    RadiusCountMismatch { points: usize, radii: usize },
    #[error("could not construct miter plane at segment {segment}: directions are antiparallel")]
    DegenerateMiter { segment: usize },
    #[error("could not project ring node {node} onto miter plane at segment {segment}: ray is parallel")]
    ParallelMiterRay { segment: usize, node: usize },
}
