//! Visualization module for queuelab.
//!
//! Provides:
//! - Chart data: pie slices, bars and line points derived from a snapshot
//! - Export: snapshots as compact or pretty JSON
//! - Web endpoint: HTTP and WebSocket server (feature-gated)
//!
//! Front ends only draw; they never recompute a metric.
//!
//! # Example
//!
//! ```rust
//! use queuelab::dashboard::Dashboard;
//! use queuelab::visualization::{ChartData, Exporter};
//!
//! let dashboard = Dashboard::default();
//! let snapshot = dashboard.snapshot().expect("default inputs are stable");
//! let charts = ChartData::from_snapshot(snapshot);
//! assert_eq!(charts.bars.len(), 15);
//!
//! let json = Exporter::new().to_string(snapshot).expect("serializable");
//! assert!(json.contains("\"generation\""));
//! ```

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardSnapshot;
use crate::error::{QueueError, QueueResult};
use crate::queue::to_minutes;

// Re-export Web module if feature enabled
#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "web")]
pub use web::{serve, WebState};

// ============================================================================
// Chart Data
// ============================================================================

/// One slice of the time-composition pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    /// Slice label.
    pub label: String,
    /// Minutes the slice represents.
    pub minutes: f64,
    /// Share of the whole, in percent.
    pub percent: f64,
}

/// One bar of the occupancy chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Number of customers n.
    pub n: usize,
    /// Probability P(n).
    pub probability: f64,
    /// P(n) as a percent with one decimal, e.g. `14.3%`.
    pub label: String,
}

/// One point of the wait-time sensitivity line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// Utilization ρ.
    pub utilization: f64,
    /// Expected wait in line, minutes.
    pub wait_minutes: f64,
}

/// Chart-ready series for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Waiting vs. being served.
    pub pie: Vec<PieSlice>,
    /// P(n) for n = 0..`max_n`.
    pub bars: Vec<Bar>,
    /// (ρ, Wq minutes) over the sweep grid.
    pub line: Vec<LinePoint>,
    /// Current (ρ, Wq minutes), for marking the operating point on the line.
    pub marker: LinePoint,
}

impl ChartData {
    /// Build every series from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let c = &snapshot.composition;
        let pie = vec![
            PieSlice {
                label: "Waiting in line".to_string(),
                minutes: c.waiting_minutes,
                percent: c.waiting_share() * 100.0,
            },
            PieSlice {
                label: "Being served".to_string(),
                minutes: c.service_minutes,
                percent: c.service_share() * 100.0,
            },
        ];

        let bars = snapshot
            .distribution
            .iter()
            .map(|(n, probability)| Bar {
                n,
                probability,
                label: format!("{:.1}%", probability * 100.0),
            })
            .collect();

        let line = snapshot
            .sweep
            .points
            .iter()
            .map(|p| LinePoint {
                utilization: p.utilization,
                wait_minutes: to_minutes(p.wait_in_queue),
            })
            .collect();

        Self {
            pie,
            bars,
            line,
            marker: LinePoint {
                utilization: snapshot.metrics.utilization,
                wait_minutes: to_minutes(snapshot.metrics.mean_wait_in_queue),
            },
        }
    }

    /// Tallest bar, for scaling the occupancy axis.
    #[must_use]
    pub fn max_probability(&self) -> f64 {
        self.bars.iter().map(|b| b.probability).fold(0.0, f64::max)
    }

    /// Largest wait on the line, for scaling the wait axis.
    #[must_use]
    pub fn max_wait_minutes(&self) -> f64 {
        self.line.iter().map(|p| p.wait_minutes).fold(0.0, f64::max)
    }

    /// Whether the operating point waits longer than anything on the line.
    #[must_use]
    pub fn marker_off_chart(&self) -> bool {
        !self.line.is_empty() && self.marker.wait_minutes > self.max_wait_minutes()
    }

    /// Marker position clamped onto the line's wait range.
    ///
    /// Near ρ = 1 the operating point can wait orders of magnitude longer
    /// than the fixed-μ sweep; it is drawn on the top edge instead.
    #[must_use]
    pub fn plotted_marker(&self) -> LinePoint {
        if self.marker_off_chart() {
            LinePoint {
                wait_minutes: self.max_wait_minutes(),
                ..self.marker
            }
        } else {
            self.marker
        }
    }

    /// Line points as `(ρ, minutes)` tuples.
    #[must_use]
    pub fn line_pairs(&self) -> Vec<(f64, f64)> {
        self.line
            .iter()
            .map(|p| (p.utilization, p.wait_minutes))
            .collect()
    }
}

// ============================================================================
// Export Pipeline
// ============================================================================

/// Export format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Single-line JSON.
    #[default]
    Json,
    /// Indented JSON.
    JsonPretty,
}

/// Exporter for dashboard snapshots.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create new exporter writing compact JSON.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit format.
    #[must_use]
    pub const fn with_format(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Serialize any value in the configured format.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_string<T: Serialize>(&self, value: &T) -> QueueResult<String> {
        let result = match self.format {
            ExportFormat::Json => serde_json::to_string(value),
            ExportFormat::JsonPretty => serde_json::to_string_pretty(value),
        };
        result.map_err(|e| QueueError::serialization(format!("JSON serialization failed: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;

    fn rush_hour() -> DashboardSnapshot {
        Dashboard::default().snapshot().cloned().expect("stable")
    }

    #[test]
    fn test_pie_slices() {
        let charts = ChartData::from_snapshot(&rush_hour());
        assert_eq!(charts.pie.len(), 2);
        assert_eq!(charts.pie[0].label, "Waiting in line");
        assert!((charts.pie[0].minutes - 10.285_714).abs() < 1e-5);
        assert!((charts.pie[0].percent + charts.pie[1].percent - 100.0).abs() < 1e-9);
        assert!((charts.pie[0].percent - 85.714_285).abs() < 1e-5);
    }

    #[test]
    fn test_bar_labels() {
        let charts = ChartData::from_snapshot(&rush_hour());
        assert_eq!(charts.bars.len(), 15);
        assert_eq!(charts.bars[0].n, 0);
        // P(0) = 1 - 6/7
        assert_eq!(charts.bars[0].label, "14.3%");
        assert!((charts.max_probability() - charts.bars[0].probability).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_in_minutes() {
        let snapshot = rush_hour();
        let charts = ChartData::from_snapshot(&snapshot);
        assert_eq!(charts.line.len(), 100);
        let last = charts.line.last().expect("non-empty");
        // μ = 35, ρ = 0.95: Wq = 0.95 / (35 · 0.05) h
        assert!((last.wait_minutes - 0.95 / (35.0 * 0.05) * 60.0).abs() < 1e-9);
        assert!((charts.max_wait_minutes() - last.wait_minutes).abs() < f64::EPSILON);
        assert!((charts.marker.wait_minutes - 10.285_714).abs() < 1e-5);
        assert_eq!(charts.line_pairs().len(), 100);
    }

    #[test]
    fn test_marker_clamped_near_saturation() {
        let charts = ChartData::from_snapshot(&rush_hour());
        assert!(!charts.marker_off_chart());
        assert_eq!(charts.plotted_marker(), charts.marker);

        let mut dashboard = Dashboard::default();
        dashboard.set_arrival_rate(99);
        dashboard.set_service_rate(100);
        dashboard.refresh();
        let charts = ChartData::from_snapshot(dashboard.snapshot().unwrap());
        // Wq = 0.99 h ≈ 5940 min, far above the μ = 35 sweep
        assert!(charts.marker.wait_minutes > 5000.0);
        assert!(charts.marker_off_chart());
        let plotted = charts.plotted_marker();
        assert!((plotted.wait_minutes - charts.max_wait_minutes()).abs() < f64::EPSILON);
        assert!((plotted.utilization - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_export_compact_and_pretty() {
        let snapshot = rush_hour();
        let compact = Exporter::new().to_string(&snapshot).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = Exporter::with_format(ExportFormat::JsonPretty)
            .to_string(&snapshot)
            .unwrap();
        assert!(pretty.contains('\n'));

        let back: DashboardSnapshot = serde_json::from_str(&pretty).unwrap();
        assert_eq!(back.generation, snapshot.generation);
        assert_eq!(back.health, snapshot.health);
    }
}
