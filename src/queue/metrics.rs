//! Closed-form M/M/1 steady-state metrics.
//!
//! # Governing Equations
//!
//! ```text
//! ρ  = λ/μ
//! L  = ρ/(1-ρ)        Lq = ρ²/(1-ρ)
//! W  = L/λ            Wq = Lq/λ
//!
//! Where:
//!   λ  = Arrival rate (arrivals/hour)
//!   μ  = Service rate (services/hour)
//!   L  = Expected number in system, Lq = expected number in line
//!   W  = Expected time in system,   Wq = expected wait in line (hours)
//! ```
//!
//! A steady state exists only when μ > λ.

use serde::{Deserialize, Serialize};

use crate::error::{QueueError, QueueResult};

/// Arrival and service rates of an M/M/1 queue, in the same time unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueParameters {
    /// Arrival rate λ (arrivals/hour).
    pub arrival_rate: f64,
    /// Service rate μ (services/hour).
    pub service_rate: f64,
}

impl QueueParameters {
    /// Create parameters without validation.
    #[must_use]
    pub const fn new(arrival_rate: f64, service_rate: f64) -> Self {
        Self {
            arrival_rate,
            service_rate,
        }
    }

    /// Utilization ρ = λ/μ, unchecked.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// Mean service time 1/μ (hours).
    #[must_use]
    pub fn mean_service_time(&self) -> f64 {
        1.0 / self.service_rate
    }

    /// Whether μ > λ.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.service_rate > self.arrival_rate
    }

    /// Check that both rates are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidParameter`] naming the first bad rate.
    pub fn validate(&self) -> QueueResult<()> {
        check_rate("arrival_rate", self.arrival_rate)?;
        check_rate("service_rate", self.service_rate)
    }
}

fn check_rate(name: &'static str, value: f64) -> QueueResult<()> {
    if !value.is_finite() {
        return Err(QueueError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(QueueError::invalid(name, value, "must be positive"));
    }
    Ok(())
}

/// Steady-state performance measures of a stable M/M/1 queue.
///
/// All times are in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Utilization ρ, fraction of time the server is busy.
    pub utilization: f64,
    /// L, expected number of customers in the system.
    pub mean_in_system: f64,
    /// Lq, expected number of customers waiting in line.
    pub mean_in_queue: f64,
    /// W, expected time a customer spends in the system.
    pub mean_time_in_system: f64,
    /// Wq, expected time a customer waits in line.
    pub mean_wait_in_queue: f64,
}

impl QueueMetrics {
    /// Mean service time, W − Wq (hours).
    #[must_use]
    pub fn mean_service_time(&self) -> f64 {
        self.mean_time_in_system - self.mean_wait_in_queue
    }

    /// Probability an arriving customer waits at all (equals ρ under PASTA).
    #[must_use]
    pub const fn probability_of_waiting(&self) -> f64 {
        self.utilization
    }

    /// Probability the server is idle, P(0) = 1 − ρ.
    #[must_use]
    pub fn probability_idle(&self) -> f64 {
        1.0 - self.utilization
    }
}

/// Compute steady-state metrics for (λ, μ).
///
/// # Errors
///
/// - [`QueueError::InvalidParameter`] if either rate is non-positive or
///   non-finite.
/// - [`QueueError::Unstable`] if μ ≤ λ.
pub fn compute(params: &QueueParameters) -> QueueResult<QueueMetrics> {
    params.validate()?;

    let rho = params.utilization();
    if !params.is_stable() {
        return Err(QueueError::unstable(rho));
    }

    let lambda = params.arrival_rate;
    let l = rho / (1.0 - rho);
    let lq = rho * rho / (1.0 - rho);

    Ok(QueueMetrics {
        utilization: rho,
        mean_in_system: l,
        mean_in_queue: lq,
        mean_time_in_system: l / lambda,
        mean_wait_in_queue: lq / lambda,
    })
}
