//! Opt-in timing hooks for the pipe builders.
//!
//! Timing is only collected when the `pipe_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). In
//! every other build all calls compile down to the wrapped closure.
//!
//! ```ignore
//! use pipe_geometry::geom::{PipeMetrics, TimingBucket};
//!
//! let mut metrics = PipeMetrics::default();
//! metrics.begin();
//! let filtered = metrics.time(TimingBucket::BendFilter, || filter_center_line(&points, options));
//! if let Some(report) = metrics.end() {
//!     println!("bend filter: {} ns", report.bend_filter_ns);
//! }
//! ```

use serde::Serialize;

/// Phases of pipe generation that are timed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Duplicate removal and bend point insertion.
    BendFilter,
    /// Fixed-radius mitered extrusion.
    Extrusion,
    /// Variable-radius tube extrusion.
    VariableTube,
    /// Center-line line mesh.
    CenterLine,
    /// Surface and center-line texture coordinates.
    TextureCoordinates,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PipeTimingReport {
    pub bend_filter_ns: u64,
    pub extrusion_ns: u64,
    pub variable_tube_ns: u64,
    pub center_line_ns: u64,
    pub texture_coordinates_ns: u64,
}

impl PipeTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.bend_filter_ns
            .saturating_add(self.extrusion_ns)
            .saturating_add(self.variable_tube_ns)
            .saturating_add(self.center_line_ns)
            .saturating_add(self.texture_coordinates_ns)
    }

    /// Total time in milliseconds, for display.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing pipe operations.
///
/// Call [`begin`](Self::begin) to reset, wrap work with [`time`](Self::time)
/// and read the report with [`end`](Self::end). With metrics disabled `end`
/// always returns `None`.
#[derive(Debug, Default, Clone)]
pub struct PipeMetrics {
    #[cfg(all(feature = "pipe_metrics", not(target_arch = "wasm32")))]
    report: PipeTimingReport,
}

impl PipeMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "pipe_metrics", not(target_arch = "wasm32")))]
        {
            self.report = PipeTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<PipeTimingReport> {
        #[cfg(all(feature = "pipe_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "pipe_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Run `f` and add its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "pipe_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "pipe_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "pipe_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::BendFilter => &mut self.report.bend_filter_ns,
            TimingBucket::Extrusion => &mut self.report.extrusion_ns,
            TimingBucket::VariableTube => &mut self.report.variable_tube_ns,
            TimingBucket::CenterLine => &mut self.report.center_line_ns,
            TimingBucket::TextureCoordinates => &mut self.report.texture_coordinates_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
