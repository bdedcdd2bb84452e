//! Diagnostics for the last bend-filter and extrusion pass.
//!
//! ```ignore
//! let mut generator = PipeGeometryGenerator::new();
//! generator.set_center_line(&points)?;
//! let surface = generator.build_surface()?;
//! log::debug!("{}", generator.diagnostics().summary());
//! ```

use std::fmt;

use serde::Serialize;

use super::metrics::PipeTimingReport;

/// Counts describing what the generator did with the last center line.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PipeDiagnostics {
    /// Points in the center line as set by the caller.
    pub input_point_count: usize,

    /// Points after duplicate collapsing and bend insertion.
    pub filtered_point_count: usize,

    /// Input points removed because they coincided with a neighbor.
    pub dropped_point_count: usize,

    /// Corners that received the two extra bend points.
    pub bend_count: usize,

    /// Rings in the last surface mesh.
    pub ring_count: usize,

    /// Quads in the last surface mesh.
    pub quad_count: usize,

    /// Set when the last surface build failed on a degenerate miter or ray.
    pub degenerate_geometry: bool,

    /// Only populated with the `pipe_metrics` feature on native targets.
    pub timing: Option<PipeTimingReport>,

    pub warnings: Vec<String>,
}

impl PipeDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing was dropped, inserted or refused.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped_point_count == 0
            && self.bend_count == 0
            && !self.degenerate_geometry
            && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Sum counts of two passes; useful when a part is built from several
    /// generators. `timing` from `other` is ignored.
    pub fn merge(&mut self, other: &PipeDiagnostics) {
        self.input_point_count += other.input_point_count;
        self.filtered_point_count += other.filtered_point_count;
        self.dropped_point_count += other.dropped_point_count;
        self.bend_count += other.bend_count;
        self.ring_count += other.ring_count;
        self.quad_count += other.quad_count;
        self.degenerate_geometry = self.degenerate_geometry || other.degenerate_geometry;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Short summary for logging.
    ///
    /// Format: `"P:{input}->{filtered} R:{rings} Q:{quads} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "P:{}->{} R:{} Q:{}",
            self.input_point_count, self.filtered_point_count, self.ring_count, self.quad_count
        )];

        if self.dropped_point_count > 0 {
            parts.push(format!("dropped:{}", self.dropped_point_count));
        }
        if self.bend_count > 0 {
            parts.push(format!("bends:{}", self.bend_count));
        }
        if self.degenerate_geometry {
            parts.push("degenerate".to_string());
        }

        parts.join(" ")
    }
}

impl fmt::Display for PipeDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipe Diagnostics:")?;
        writeln!(f, "  Input points: {}", self.input_point_count)?;
        writeln!(f, "  Filtered points: {}", self.filtered_point_count)?;
        writeln!(f, "  Rings: {}", self.ring_count)?;
        writeln!(f, "  Quads: {}", self.quad_count)?;

        if self.dropped_point_count > 0 || self.bend_count > 0 {
            writeln!(f, "  Filter:")?;
            if self.dropped_point_count > 0 {
                writeln!(f, "    - Dropped duplicate points: {}", self.dropped_point_count)?;
            }
            if self.bend_count > 0 {
                writeln!(f, "    - Sharp bends: {}", self.bend_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {}", warning)?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.degenerate_geometry {
            "DEGENERATE"
        } else if self.is_clean() {
            "CLEAN"
        } else {
            "FILTERED"
        };
        writeln!(f, "  Status: {}", status)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clean() {
        let diag = PipeDiagnostics::default();
        assert!(diag.is_clean());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn filtering_is_not_clean() {
        let diag = PipeDiagnostics { bend_count: 1, ..Default::default() };
        assert!(!diag.is_clean());
        assert!(format!("{diag}").contains("FILTERED"));
    }

    #[test]
    fn merge_sums_counts() {
        let mut a = PipeDiagnostics {
            input_point_count: 10,
            quad_count: 80,
            warnings: vec!["first".to_string()],
            ..Default::default()
        };
        let b = PipeDiagnostics {
            input_point_count: 4,
            quad_count: 24,
            degenerate_geometry: true,
            warnings: vec!["second".to_string()],
            ..Default::default()
        };
        a.merge(&b);

        assert_eq!(a.input_point_count, 14);
        assert_eq!(a.quad_count, 104);
        assert!(a.degenerate_geometry);
        assert_eq!(a.warnings.len(), 2);
    }

    #[test]
    fn summary_lists_issues() {
        let diag = PipeDiagnostics {
            input_point_count: 10,
            filtered_point_count: 12,
            ring_count: 12,
            quad_count: 88,
            dropped_point_count: 2,
            bend_count: 2,
            ..Default::default()
        };
        let summary = diag.summary();
        assert!(summary.contains("P:10->12"));
        assert!(summary.contains("Q:88"));
        assert!(summary.contains("dropped:2"));
        assert!(summary.contains("bends:2"));
    }

    #[test]
    fn display_reports_degenerate_status() {
        let mut diag = PipeDiagnostics { degenerate_geometry: true, ..Default::default() };
        diag.add_warning("miter failed at segment 3");
        let output = format!("{}", diag);
        assert!(output.contains("miter failed at segment 3"));
        assert!(output.contains("DEGENERATE"));
    }
}
