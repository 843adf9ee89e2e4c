//! Derived facts the dashboard reports alongside the raw metrics.
//!
//! Nothing here formats for a particular front end; the CLI, the terminal
//! dashboard and the web page all render these values their own way.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::metrics::{QueueMetrics, QueueParameters};

/// Minutes per hour; metrics are hours, the dashboard speaks minutes.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Convert hours to minutes.
#[must_use]
pub fn to_minutes(hours: f64) -> f64 {
    hours * MINUTES_PER_HOUR
}

/// Utilization bands for the health classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Utilization above which the server counts as busy.
    pub warning: f64,
    /// Utilization above which the server counts as overloaded.
    pub critical: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            warning: 0.70,
            critical: 0.85,
        }
    }
}

/// Operating condition of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Utilization within safe limits.
    Healthy,
    /// Server is fairly busy; waits climb quickly from here.
    Warning,
    /// Server is too busy.
    Critical,
}

impl HealthStatus {
    /// Classify a utilization. Band edges belong to the lower band.
    #[must_use]
    pub fn classify(rho: f64, thresholds: &HealthThresholds) -> Self {
        if rho > thresholds.critical {
            Self::Critical
        } else if rho > thresholds.warning {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    /// Short label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Warning => "Needs attention",
            Self::Critical => "Critical",
        }
    }

    /// One-line description of the condition at utilization `rho`.
    #[must_use]
    pub fn describe(self, rho: f64) -> String {
        let pct = rho * 100.0;
        match self {
            Self::Healthy => format!("Healthy ({pct:.1}%): still within safe limits."),
            Self::Warning => format!("Needs attention ({pct:.1}%): the system is fairly busy."),
            Self::Critical => format!("Critical ({pct:.1}%): the server is too busy."),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a customer's time in the system splits between waiting and service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeComposition {
    /// Minutes waiting in line (Wq·60).
    pub waiting_minutes: f64,
    /// Minutes being served (60/μ).
    pub service_minutes: f64,
}

impl TimeComposition {
    /// Build from the parameters and their metrics.
    #[must_use]
    pub fn new(params: &QueueParameters, metrics: &QueueMetrics) -> Self {
        Self {
            waiting_minutes: to_minutes(metrics.mean_wait_in_queue),
            service_minutes: to_minutes(params.mean_service_time()),
        }
    }

    /// Total minutes in the system (W·60).
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.waiting_minutes + self.service_minutes
    }

    /// Share of time spent waiting, in [0, 1]. Equals ρ for M/M/1.
    #[must_use]
    pub fn waiting_share(&self) -> f64 {
        let total = self.total_minutes();
        if total > 0.0 {
            self.waiting_minutes / total
        } else {
            0.0
        }
    }

    /// Share of time spent being served, in [0, 1].
    #[must_use]
    pub fn service_share(&self) -> f64 {
        let total = self.total_minutes();
        if total > 0.0 {
            self.service_minutes / total
        } else {
            0.0
        }
    }
}

/// Headline recommendation shown above the metrics.
#[must_use]
pub fn recommendation(metrics: &QueueMetrics) -> String {
    format!(
        "At the current service rate, a customer waits on average {:.1} minutes in line.",
        to_minutes(metrics.mean_wait_in_queue)
    )
}

/// One line of the worked calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// Symbol being computed (e.g. `ρ`, `Lq`).
    pub symbol: String,
    /// Substituted expression (e.g. `30 / 35`).
    pub expression: String,
    /// Resulting value.
    pub value: f64,
    /// Unit of the value.
    pub unit: String,
    /// Same value in minutes, for the time metrics.
    pub minutes: Option<f64>,
}

impl fmt::Display for CalculationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = if self.minutes.is_some() { 3 } else { 2 };
        write!(
            f,
            "{} = {} = {:.*}",
            self.symbol, self.expression, precision, self.value
        )?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(minutes) = self.minutes {
            write!(f, " ({minutes:.2} minutes)")?;
        }
        Ok(())
    }
}

/// The worked calculation of ρ, L, Lq, W and Wq from λ and μ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSteps {
    /// Steps in the order they are derived.
    pub steps: Vec<CalculationStep>,
}

impl CalculationSteps {
    /// Reproduce the derivation for `params`, using the already-computed
    /// `metrics` for the values.
    #[must_use]
    pub fn derive(params: &QueueParameters, metrics: &QueueMetrics) -> Self {
        let lambda = params.arrival_rate;
        let mu = params.service_rate;
        let rho = metrics.utilization;
        let l = metrics.mean_in_system;
        let lq = metrics.mean_in_queue;

        let step = |symbol: &str, expression: String, value: f64, unit: &str, minutes| {
            CalculationStep {
                symbol: symbol.to_string(),
                expression,
                value,
                unit: unit.to_string(),
                minutes,
            }
        };

        Self {
            steps: vec![
                step("ρ", format!("{lambda} / {mu}"), rho, "", None),
                step("L", format!("{rho:.2} / (1 - {rho:.2})"), l, "customers in system", None),
                step("Lq", format!("{rho:.2}² / (1 - {rho:.2})"), lq, "customers in line", None),
                step(
                    "W",
                    format!("{l:.2} / {lambda}"),
                    metrics.mean_time_in_system,
                    "hours",
                    Some(to_minutes(metrics.mean_time_in_system)),
                ),
                step(
                    "Wq",
                    format!("{lq:.2} / {lambda}"),
                    metrics.mean_wait_in_queue,
                    "hours",
                    Some(to_minutes(metrics.mean_wait_in_queue)),
                ),
            ],
        }
    }

    /// Iterate the steps.
    pub fn iter(&self) -> impl Iterator<Item = &CalculationStep> {
        self.steps.iter()
    }
}
