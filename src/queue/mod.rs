//! M/M/1 queue computations.
//!
//! Everything here is a pure function of its inputs: parameters go in, a
//! fresh immutable record comes out. The single failure mode is
//! [`QueueError::Unstable`](crate::error::QueueError::Unstable), which callers
//! must treat as "no metrics exist" and skip all dependent work.
//!
//! # Example
//!
//! ```rust
//! use queuelab::queue::{QueueMetricsCalculator, QueueParameters};
//!
//! let calc = QueueMetricsCalculator::default();
//! let metrics = calc.compute(&QueueParameters::new(10.0, 20.0)).expect("stable");
//! assert!((metrics.utilization - 0.5).abs() < 1e-12);
//!
//! let dist = calc.distribution_for(&metrics).expect("stable");
//! assert_eq!(dist.len(), 15);
//! ```

pub mod distribution;
pub mod insight;
pub mod metrics;
pub mod sweep;

pub use distribution::{
    occupancy_distribution, OccupancyDistribution, OccupancyProbability, DEFAULT_MAX_N,
    MAX_DISTRIBUTION_LEN,
};
pub use insight::{
    recommendation, to_minutes, CalculationStep, CalculationSteps, HealthStatus,
    HealthThresholds, TimeComposition, MINUTES_PER_HOUR,
};
pub use metrics::{compute, QueueMetrics, QueueParameters};
pub use sweep::{
    utilization_sweep, SweepPoint, UtilizationSweep, DEFAULT_RHO_MAX, DEFAULT_RHO_MIN,
    DEFAULT_SWEEP_STEPS, MAX_SWEEP_STEPS,
};

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::{QueueError, QueueResult};

/// Utilization grid for the sensitivity sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Fixed service rate μ for the sweep.
    pub service_rate: f64,
    /// Smallest sampled utilization.
    pub rho_min: f64,
    /// Largest sampled utilization, below 1.
    pub rho_max: f64,
    /// Number of samples.
    pub steps: usize,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            service_rate: 35.0,
            rho_min: DEFAULT_RHO_MIN,
            rho_max: DEFAULT_RHO_MAX,
            steps: DEFAULT_SWEEP_STEPS,
        }
    }
}

impl SweepGrid {
    /// Check that the grid stays inside the stable region:
    /// μ > 0 and 0 < `rho_min` ≤ `rho_max` < 1.
    ///
    /// # Errors
    ///
    /// [`QueueError::InvalidParameter`] naming the first offending field.
    pub fn check(&self) -> QueueResult<()> {
        let mu = self.service_rate;
        if !(mu.is_finite() && mu > 0.0) {
            return Err(QueueError::invalid("mu", mu, "must be positive"));
        }
        if !(self.rho_min.is_finite() && self.rho_min > 0.0) {
            return Err(QueueError::invalid("rho_min", self.rho_min, "must be positive"));
        }
        if !(self.rho_max.is_finite() && self.rho_max < 1.0) {
            return Err(QueueError::invalid("rho_max", self.rho_max, "must be below 1"));
        }
        if self.rho_min > self.rho_max {
            return Err(QueueError::invalid(
                "rho_min",
                self.rho_min,
                "must not exceed rho_max",
            ));
        }
        if self.steps > MAX_SWEEP_STEPS {
            return Err(QueueError::invalid(
                "steps",
                self.steps as f64,
                "must not exceed 10000",
            ));
        }
        Ok(())
    }
}

/// Calculator carrying the fixed display ranges (distribution length and
/// sweep grid) so front ends don't repeat them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueMetricsCalculator {
    /// Number of occupancy levels (n = 0..`max_n`).
    pub max_n: usize,
    /// Sweep grid.
    pub grid: SweepGrid,
}

impl Default for QueueMetricsCalculator {
    fn default() -> Self {
        Self {
            max_n: DEFAULT_MAX_N,
            grid: SweepGrid::default(),
        }
    }
}

impl QueueMetricsCalculator {
    /// Create a calculator with explicit ranges.
    #[must_use]
    pub const fn new(max_n: usize, grid: SweepGrid) -> Self {
        Self { max_n, grid }
    }

    /// Create a calculator from validated configuration.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            max_n: config.distribution.max_n,
            grid: config.sweep.grid(),
        }
    }

    /// Steady-state metrics. See [`metrics::compute`].
    ///
    /// # Errors
    ///
    /// `Unstable` if μ ≤ λ, `InvalidParameter` if a rate is not positive.
    pub fn compute(&self, params: &QueueParameters) -> QueueResult<QueueMetrics> {
        compute(params)
    }

    /// Occupancy distribution for an arbitrary ρ and length.
    ///
    /// # Errors
    ///
    /// `Unstable` if ρ ≥ 1.
    pub fn occupancy_distribution(
        &self,
        rho: f64,
        max_n: usize,
    ) -> QueueResult<OccupancyDistribution> {
        occupancy_distribution(rho, max_n)
    }

    /// Occupancy distribution of the configured length for computed metrics.
    ///
    /// # Errors
    ///
    /// `Unstable` if the metrics' utilization is at or above 1.
    pub fn distribution_for(&self, metrics: &QueueMetrics) -> QueueResult<OccupancyDistribution> {
        occupancy_distribution(metrics.utilization, self.max_n)
    }

    /// Sweep over an arbitrary grid. See [`sweep::utilization_sweep`].
    #[must_use]
    pub fn utilization_sweep(
        &self,
        service_rate: f64,
        rho_min: f64,
        rho_max: f64,
        steps: usize,
    ) -> UtilizationSweep {
        utilization_sweep(service_rate, rho_min, rho_max, steps)
    }

    /// Sweep over the configured grid.
    #[must_use]
    pub fn default_sweep(&self) -> UtilizationSweep {
        let g = &self.grid;
        utilization_sweep(g.service_rate, g.rho_min, g.rho_max, g.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueueError;

    #[test]
    fn test_default_calculator_ranges() {
        let calc = QueueMetricsCalculator::default();
        assert_eq!(calc.max_n, 15);
        let sweep = calc.default_sweep();
        assert_eq!(sweep.len(), 100);
        assert!((sweep.service_rate - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pipeline_short_circuits_on_unstable() {
        let calc = QueueMetricsCalculator::default();
        let result = calc
            .compute(&QueueParameters::new(50.0, 50.0))
            .and_then(|m| calc.distribution_for(&m));
        assert!(matches!(result, Err(QueueError::Unstable { .. })));
    }

    #[test]
    fn test_from_config() {
        let config = DashboardConfig::builder().max_n(8).sweep_steps(10).build();
        let calc = QueueMetricsCalculator::from_config(&config);
        assert_eq!(calc.max_n, 8);
        assert_eq!(calc.default_sweep().len(), 10);
    }

    #[test]
    fn test_grid_check() {
        assert!(SweepGrid::default().check().is_ok());

        let bad = [
            SweepGrid { rho_max: 1.0, ..SweepGrid::default() },
            SweepGrid { rho_min: 0.0, ..SweepGrid::default() },
            SweepGrid { rho_min: 0.9, rho_max: 0.5, ..SweepGrid::default() },
            SweepGrid { service_rate: -1.0, ..SweepGrid::default() },
            SweepGrid { steps: MAX_SWEEP_STEPS + 1, ..SweepGrid::default() },
        ];
        for grid in bad {
            let err = grid.check().expect_err("invalid grid");
            assert!(matches!(err, QueueError::InvalidParameter { .. }), "{grid:?}");
        }
    }

    #[test]
    fn test_delegates() {
        let calc = QueueMetricsCalculator::new(5, SweepGrid::default());
        assert_eq!(calc.occupancy_distribution(0.5, 3).map(|d| d.len()).ok(), Some(3));
        assert_eq!(calc.utilization_sweep(10.0, 0.1, 0.5, 5).len(), 5);
    }
}
