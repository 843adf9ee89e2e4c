//! Reactive dashboard state.
//!
//! One parameter change produces one recomputation and one fresh
//! [`DashboardSnapshot`]. Snapshots are tagged with the generation of the
//! inputs they were computed from; [`Dashboard::accept`] drops any snapshot
//! whose generation is older than the current inputs, so a late result can
//! never overwrite a newer one.

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::{QueueError, QueueResult};
use crate::queue::{
    recommendation, CalculationSteps, HealthStatus, HealthThresholds, OccupancyDistribution,
    QueueMetrics, QueueMetricsCalculator, QueueParameters, TimeComposition, UtilizationSweep,
};

/// Which slider a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slider {
    /// Arrival rate λ.
    ArrivalRate,
    /// Service rate μ.
    ServiceRate,
}

impl Slider {
    /// The other slider.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::ArrivalRate => Self::ServiceRate,
            Self::ServiceRate => Self::ArrivalRate,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ArrivalRate => "Arrival rate λ (cars/hour)",
            Self::ServiceRate => "Service rate μ (cars/hour)",
        }
    }
}

/// Everything the display layer needs for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Generation of the inputs this snapshot was computed from.
    pub generation: u64,
    /// Inputs.
    pub parameters: QueueParameters,
    /// Steady-state metrics.
    pub metrics: QueueMetrics,
    /// Occupancy probabilities P(n).
    pub distribution: OccupancyDistribution,
    /// Wait-time sensitivity sweep.
    pub sweep: UtilizationSweep,
    /// Health classification.
    pub health: HealthStatus,
    /// Waiting vs. service split.
    pub composition: TimeComposition,
    /// Headline recommendation.
    pub recommendation: String,
    /// Worked calculation.
    pub steps: CalculationSteps,
}

impl DashboardSnapshot {
    /// Compute a snapshot for `params`.
    ///
    /// # Errors
    ///
    /// `Unstable` if μ ≤ λ; nothing downstream is computed in that case.
    pub fn compute(
        calculator: &QueueMetricsCalculator,
        thresholds: &HealthThresholds,
        params: QueueParameters,
        generation: u64,
    ) -> QueueResult<Self> {
        let metrics = calculator.compute(&params)?;
        let distribution = calculator.distribution_for(&metrics)?;
        let sweep = calculator.default_sweep();

        Ok(Self {
            generation,
            parameters: params,
            health: HealthStatus::classify(metrics.utilization, thresholds),
            composition: TimeComposition::new(&params, &metrics),
            recommendation: recommendation(&metrics),
            steps: CalculationSteps::derive(&params, &metrics),
            metrics,
            distribution,
            sweep,
        })
    }
}

/// Slider state plus the latest accepted output.
#[derive(Debug)]
pub struct Dashboard {
    calculator: QueueMetricsCalculator,
    thresholds: HealthThresholds,
    slider_min: u32,
    slider_max: u32,
    slider_step: u32,
    defaults: (u32, u32),
    arrival_rate: u32,
    service_rate: u32,
    generation: u64,
    current: Option<(u64, QueueResult<DashboardSnapshot>)>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl Dashboard {
    /// Create a dashboard at the configured defaults and compute its first
    /// snapshot.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        let defaults = (config.defaults.arrival_rate, config.defaults.service_rate);
        let mut dashboard = Self {
            calculator: QueueMetricsCalculator::from_config(config),
            thresholds: config.thresholds(),
            slider_min: config.sliders.min,
            slider_max: config.sliders.max,
            slider_step: config.sliders.step.max(1),
            defaults,
            arrival_rate: defaults.0,
            service_rate: defaults.1,
            generation: 0,
            current: None,
        };
        dashboard.refresh();
        dashboard
    }

    /// Current λ slider value.
    #[must_use]
    pub const fn arrival_rate(&self) -> u32 {
        self.arrival_rate
    }

    /// Current μ slider value.
    #[must_use]
    pub const fn service_rate(&self) -> u32 {
        self.service_rate
    }

    /// Slider range as `(min, max)`.
    #[must_use]
    pub const fn slider_range(&self) -> (u32, u32) {
        (self.slider_min, self.slider_max)
    }

    /// Generation of the current inputs.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current inputs as rates.
    #[must_use]
    pub fn parameters(&self) -> QueueParameters {
        QueueParameters::new(f64::from(self.arrival_rate), f64::from(self.service_rate))
    }

    /// The calculator this dashboard uses.
    #[must_use]
    pub const fn calculator(&self) -> &QueueMetricsCalculator {
        &self.calculator
    }

    fn clamp(&self, value: u32) -> u32 {
        value.clamp(self.slider_min, self.slider_max)
    }

    /// Move a slider to `value` (clamped into range). Returns whether the
    /// input changed; an unchanged input keeps its generation.
    pub fn set(&mut self, slider: Slider, value: u32) -> bool {
        let value = self.clamp(value);
        let target = match slider {
            Slider::ArrivalRate => &mut self.arrival_rate,
            Slider::ServiceRate => &mut self.service_rate,
        };
        if *target == value {
            return false;
        }
        *target = value;
        self.generation += 1;
        tracing::debug!(
            ?slider,
            value,
            generation = self.generation,
            "slider moved"
        );
        true
    }

    /// Set λ.
    pub fn set_arrival_rate(&mut self, value: u32) -> bool {
        self.set(Slider::ArrivalRate, value)
    }

    /// Set μ.
    pub fn set_service_rate(&mut self, value: u32) -> bool {
        self.set(Slider::ServiceRate, value)
    }

    /// Nudge a slider by `steps` increments (negative moves down).
    pub fn nudge(&mut self, slider: Slider, steps: i64) -> bool {
        let current = match slider {
            Slider::ArrivalRate => self.arrival_rate,
            Slider::ServiceRate => self.service_rate,
        };
        let delta = steps.saturating_mul(i64::from(self.slider_step));
        let target = i64::from(current)
            .saturating_add(delta)
            .clamp(i64::from(self.slider_min), i64::from(self.slider_max));
        let target = u32::try_from(target).unwrap_or(self.slider_max);
        self.set(slider, target)
    }

    /// Return both sliders to their configured defaults.
    pub fn reset(&mut self) -> bool {
        let a = self.set_arrival_rate(self.defaults.0);
        let b = self.set_service_rate(self.defaults.1);
        a || b
    }

    /// Compute a snapshot for the current inputs without storing it.
    ///
    /// # Errors
    ///
    /// `Unstable` if μ ≤ λ.
    pub fn recompute(&self) -> QueueResult<DashboardSnapshot> {
        let params = self.parameters();
        let result =
            DashboardSnapshot::compute(&self.calculator, &self.thresholds, params, self.generation);
        match &result {
            Ok(snapshot) => tracing::debug!(
                generation = snapshot.generation,
                utilization = snapshot.metrics.utilization,
                health = %snapshot.health,
                "dashboard recomputed"
            ),
            Err(e) => tracing::warn!(
                lambda = params.arrival_rate,
                mu = params.service_rate,
                error = %e,
                "dashboard inputs have no steady state"
            ),
        }
        result
    }

    /// Store `output`, computed from the inputs of `generation`, if those are
    /// still the current inputs.
    ///
    /// Returns `false` and discards the output when it is stale.
    pub fn accept(&mut self, generation: u64, output: QueueResult<DashboardSnapshot>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale snapshot"
            );
            return false;
        }
        self.current = Some((generation, output));
        true
    }

    /// Recompute and store the result for the current inputs.
    pub fn refresh(&mut self) {
        let generation = self.generation;
        let output = self.recompute();
        self.accept(generation, output);
    }

    /// Latest accepted snapshot, if the current inputs are stable.
    #[must_use]
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.current.as_ref().and_then(|(_, r)| r.as_ref().ok())
    }

    /// Latest accepted error, if the current inputs have no steady state.
    #[must_use]
    pub fn error(&self) -> Option<&QueueError> {
        self.current.as_ref().and_then(|(_, r)| r.as_ref().err())
    }

    /// Whether the stored output matches the current inputs.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(generation, _)| *generation == self.generation)
    }
}
