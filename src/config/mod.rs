//! Dashboard configuration with YAML schema and validation.
//!
//! Mistake-proofing happens in two passes:
//! - Schema: serde (`deny_unknown_fields`) and `validator` range checks
//! - Semantics: cross-field rules (slider bounds, grid below ρ = 1, ordered
//!   health thresholds)

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{QueueError, QueueResult};
use crate::queue::{
    HealthThresholds, QueueParameters, SweepGrid, DEFAULT_MAX_N, DEFAULT_RHO_MAX,
    DEFAULT_RHO_MIN, DEFAULT_SWEEP_STEPS,
};

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Scenario description shown as the dashboard title.
    #[serde(default)]
    pub scenario: ScenarioMeta,

    /// Initial slider positions.
    #[validate(nested)]
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Slider ranges.
    #[validate(nested)]
    #[serde(default)]
    pub sliders: SliderConfig,

    /// Occupancy chart settings.
    #[validate(nested)]
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Sensitivity sweep grid.
    #[validate(nested)]
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Health classification thresholds.
    #[validate(nested)]
    #[serde(default)]
    pub health: HealthConfig,

    /// Front-end settings.
    #[validate(nested)]
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl DashboardConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> QueueResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading dashboard configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> QueueResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self) -> QueueResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> QueueResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> QueueResult<()> {
        let s = &self.sliders;
        if s.min > s.max {
            return Err(QueueError::config(format!(
                "slider min {} exceeds max {}",
                s.min, s.max
            )));
        }

        for (name, value) in [
            ("arrival_rate", self.defaults.arrival_rate),
            ("service_rate", self.defaults.service_rate),
        ] {
            if !(s.min..=s.max).contains(&value) {
                return Err(QueueError::config(format!(
                    "default {name} {value} lies outside slider range [{}, {}]",
                    s.min, s.max
                )));
            }
        }

        let sw = &self.sweep;
        if !(sw.service_rate.is_finite() && sw.service_rate > 0.0) {
            return Err(QueueError::config("sweep service_rate must be positive"));
        }
        if !(sw.rho_min > 0.0 && sw.rho_min <= sw.rho_max) {
            return Err(QueueError::config(format!(
                "sweep grid [{}, {}] must satisfy 0 < rho_min <= rho_max",
                sw.rho_min, sw.rho_max
            )));
        }
        if sw.rho_max >= 1.0 {
            return Err(QueueError::config(format!(
                "sweep rho_max {} must stay below 1 (waits diverge at full utilization)",
                sw.rho_max
            )));
        }

        let h = &self.health;
        if !(0.0 < h.warning && h.warning < h.critical && h.critical < 1.0) {
            return Err(QueueError::config(format!(
                "health thresholds must satisfy 0 < warning ({}) < critical ({}) < 1",
                h.warning, h.critical
            )));
        }

        Ok(())
    }

    /// Initial parameters from the slider defaults.
    #[must_use]
    pub fn initial_parameters(&self) -> QueueParameters {
        QueueParameters::new(
            f64::from(self.defaults.arrival_rate),
            f64::from(self.defaults.service_rate),
        )
    }

    /// Health thresholds in the form the classifier takes.
    #[must_use]
    pub const fn thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            warning: self.health.warning,
            critical: self.health.critical,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            scenario: ScenarioMeta::default(),
            defaults: DefaultsConfig::default(),
            sliders: SliderConfig::default(),
            distribution: DistributionConfig::default(),
            sweep: SweepConfig::default(),
            health: HealthConfig::default(),
            visualization: VisualizationConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    arrival_rate: Option<u32>,
    service_rate: Option<u32>,
    max_n: Option<usize>,
    sweep_steps: Option<usize>,
    sweep_service_rate: Option<f64>,
    thresholds: Option<HealthThresholds>,
    port: Option<u16>,
}

impl DashboardConfigBuilder {
    /// Set the initial arrival rate slider.
    #[must_use]
    pub const fn arrival_rate(mut self, lambda: u32) -> Self {
        self.arrival_rate = Some(lambda);
        self
    }

    /// Set the initial service rate slider.
    #[must_use]
    pub const fn service_rate(mut self, mu: u32) -> Self {
        self.service_rate = Some(mu);
        self
    }

    /// Set the occupancy chart length.
    #[must_use]
    pub const fn max_n(mut self, max_n: usize) -> Self {
        self.max_n = Some(max_n);
        self
    }

    /// Set the number of sweep samples.
    #[must_use]
    pub const fn sweep_steps(mut self, steps: usize) -> Self {
        self.sweep_steps = Some(steps);
        self
    }

    /// Set the fixed service rate of the sweep.
    #[must_use]
    pub const fn sweep_service_rate(mut self, mu: f64) -> Self {
        self.sweep_service_rate = Some(mu);
        self
    }

    /// Set the health thresholds.
    #[must_use]
    pub const fn thresholds(mut self, thresholds: HealthThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Set the web server port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> DashboardConfig {
        let mut config = DashboardConfig::default();

        if let Some(lambda) = self.arrival_rate {
            config.defaults.arrival_rate = lambda;
        }
        if let Some(mu) = self.service_rate {
            config.defaults.service_rate = mu;
        }
        if let Some(max_n) = self.max_n {
            config.distribution.max_n = max_n;
        }
        if let Some(steps) = self.sweep_steps {
            config.sweep.steps = steps;
        }
        if let Some(mu) = self.sweep_service_rate {
            config.sweep.service_rate = mu;
        }
        if let Some(t) = self.thresholds {
            config.health.warning = t.warning;
            config.health.critical = t.critical;
        }
        if let Some(port) = self.port {
            config.visualization.web.port = port;
        }

        config
    }
}

/// Scenario metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioMeta {
    /// Scenario title.
    #[serde(default = "default_scenario_name")]
    pub name: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
}

fn default_scenario_name() -> String {
    "Drive-thru at rush hour".to_string()
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            name: default_scenario_name(),
            description: "Balance operating cost against customer wait time at a single service window."
                .to_string(),
        }
    }
}

/// Initial slider positions (arrivals/hour and services/hour).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Initial λ.
    #[validate(range(min = 1))]
    #[serde(default = "default_arrival_rate")]
    pub arrival_rate: u32,
    /// Initial μ.
    #[validate(range(min = 1))]
    #[serde(default = "default_service_rate")]
    pub service_rate: u32,
}

const fn default_arrival_rate() -> u32 {
    30
}

const fn default_service_rate() -> u32 {
    35
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            arrival_rate: default_arrival_rate(),
            service_rate: default_service_rate(),
        }
    }
}

/// Integer slider range shared by λ and μ.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SliderConfig {
    /// Lowest selectable rate.
    #[validate(range(min = 1))]
    #[serde(default = "default_slider_min")]
    pub min: u32,
    /// Highest selectable rate.
    #[validate(range(min = 1, max = 100_000))]
    #[serde(default = "default_slider_max")]
    pub max: u32,
    /// Increment per key press in the terminal dashboard.
    #[validate(range(min = 1))]
    #[serde(default = "default_slider_step")]
    pub step: u32,
}

const fn default_slider_min() -> u32 {
    1
}

const fn default_slider_max() -> u32 {
    100
}

const fn default_slider_step() -> u32 {
    1
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: default_slider_min(),
            max: default_slider_max(),
            step: default_slider_step(),
        }
    }
}

/// Occupancy chart settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DistributionConfig {
    /// Number of bars, n = 0..`max_n`.
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_max_n")]
    pub max_n: usize,
}

const fn default_max_n() -> usize {
    DEFAULT_MAX_N
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_n: default_max_n(),
        }
    }
}

/// Sensitivity sweep grid.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Fixed μ for the sweep, independent of the slider selection.
    #[serde(default = "default_sweep_service_rate")]
    pub service_rate: f64,
    /// Smallest sampled utilization.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_rho_min")]
    pub rho_min: f64,
    /// Largest sampled utilization.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_rho_max")]
    pub rho_max: f64,
    /// Number of samples.
    #[validate(range(min = 1, max = 10_000))]
    #[serde(default = "default_sweep_steps")]
    pub steps: usize,
}

const fn default_sweep_service_rate() -> f64 {
    35.0
}

const fn default_rho_min() -> f64 {
    DEFAULT_RHO_MIN
}

const fn default_rho_max() -> f64 {
    DEFAULT_RHO_MAX
}

const fn default_sweep_steps() -> usize {
    DEFAULT_SWEEP_STEPS
}

impl SweepConfig {
    /// The grid in the form the calculator takes.
    #[must_use]
    pub const fn grid(&self) -> SweepGrid {
        SweepGrid {
            service_rate: self.service_rate,
            rho_min: self.rho_min,
            rho_max: self.rho_max,
            steps: self.steps,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            service_rate: default_sweep_service_rate(),
            rho_min: default_rho_min(),
            rho_max: default_rho_max(),
            steps: default_sweep_steps(),
        }
    }
}

/// Health classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Utilization above which the system needs attention.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_warning")]
    pub warning: f64,
    /// Utilization above which the system is critical.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_critical")]
    pub critical: f64,
}

const fn default_warning() -> f64 {
    0.70
}

const fn default_critical() -> f64 {
    0.85
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            warning: default_warning(),
            critical: default_critical(),
        }
    }
}

/// Front-end configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VisualizationConfig {
    /// Terminal dashboard configuration.
    #[validate(nested)]
    #[serde(default)]
    pub tui: TuiConfig,
    /// Web dashboard configuration.
    #[validate(nested)]
    #[serde(default)]
    pub web: WebConfig,
}

/// Terminal dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    /// Redraw rate in Hz.
    #[validate(range(min = 1, max = 240))]
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

const fn default_refresh_hz() -> u32 {
    30
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
        }
    }
}

/// Web dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WebConfig {
    /// Bind address.
    #[validate(length(min = 1))]
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Web server port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}
