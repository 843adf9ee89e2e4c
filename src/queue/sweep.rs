//! Wait-time sensitivity to utilization.
//!
//! For a fixed μ, each sampled ρ implies λ = ρ·μ and
//! Wq = Lq/λ = ρ / (μ·(1−ρ)), which rises hyperbolically as ρ → 1.

use serde::{Deserialize, Serialize};

/// Lower end of the default utilization grid.
pub const DEFAULT_RHO_MIN: f64 = 0.01;
/// Upper end of the default utilization grid.
pub const DEFAULT_RHO_MAX: f64 = 0.95;
/// Number of samples in the default utilization grid.
pub const DEFAULT_SWEEP_STEPS: usize = 100;
/// Largest grid any front end will compute.
pub const MAX_SWEEP_STEPS: usize = 10_000;

/// One sample of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Utilization ρ.
    pub utilization: f64,
    /// Expected wait in line Wq (hours) at that utilization.
    pub wait_in_queue: f64,
}

/// Ordered (ρ, Wq) samples over a utilization grid for a fixed μ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationSweep {
    /// Service rate μ the sweep was computed for.
    pub service_rate: f64,
    /// Samples in increasing ρ order.
    pub points: Vec<SweepPoint>,
}

impl UtilizationSweep {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the sweep has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ratio of the last wait to the first.
    ///
    /// Returns 0.0 when the sweep has fewer than two points or the first wait
    /// is zero.
    #[must_use]
    pub fn hockey_stick_ratio(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last))
                if self.points.len() > 1 && first.wait_in_queue > f64::EPSILON =>
            {
                last.wait_in_queue / first.wait_in_queue
            }
            _ => 0.0,
        }
    }
}

/// `steps` evenly spaced values over the closed range [`start`, `end`].
fn linspace(start: f64, end: f64, steps: usize) -> impl Iterator<Item = f64> {
    let span = end - start;
    let denom = steps.saturating_sub(1).max(1) as f64;
    (0..steps).map(move |i| {
        if i + 1 == steps && steps > 1 {
            end
        } else {
            start + span * (i as f64) / denom
        }
    })
}

/// Sample Wq over `steps` evenly spaced utilizations in [`rho_min`, `rho_max`].
///
/// Precondition: 0 < `rho_min` ≤ `rho_max` < 1 and `service_rate` > 0. The
/// configuration layer enforces this for every grid it hands out.
#[must_use]
pub fn utilization_sweep(
    service_rate: f64,
    rho_min: f64,
    rho_max: f64,
    steps: usize,
) -> UtilizationSweep {
    let points = linspace(rho_min, rho_max, steps)
        .map(|rho| {
            let lambda = rho * service_rate;
            let lq = rho * rho / (1.0 - rho);
            SweepPoint {
                utilization: rho,
                wait_in_queue: lq / lambda,
            }
        })
        .collect();

    UtilizationSweep {
        service_rate,
        points,
    }
}
