//! Terminal dashboard application state and logic.
//!
//! Key bindings:
//!
//! | Key          | Action                      |
//! |--------------|-----------------------------|
//! | `←` / `→`    | arrival rate λ down / up    |
//! | `↓` / `↑`    | service rate μ down / up    |
//! | `Tab`        | select the other slider     |
//! | `+` / `-`    | nudge the selected slider   |
//! | `s`          | show / hide the calculation |
//! | `r`          | reset to defaults           |
//! | `q` / `Esc`  | quit                        |

use std::path::Path;
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardSnapshot, Slider};
use crate::error::{QueueError, QueueResult};
use crate::visualization::ChartData;

/// Application state for the terminal dashboard.
#[derive(Debug)]
pub struct DashboardApp {
    /// Slider values and the latest accepted snapshot.
    pub dashboard: Dashboard,
    /// Slider `+`/`-` act on.
    pub selected: Slider,
    /// Whether the worked calculation panel is shown.
    pub show_steps: bool,
    /// Scenario title from the configuration.
    pub title: String,
    /// Redraw interval.
    pub tick_rate: Duration,
    /// Path the configuration was loaded from, if any.
    pub loaded_path: Option<String>,
    should_quit: bool,
    charts: Option<ChartData>,
}

impl Default for DashboardApp {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl DashboardApp {
    /// Create the app at the configured defaults.
    #[must_use]
    pub fn new(config: &DashboardConfig) -> Self {
        let dashboard = Dashboard::new(config);
        let charts = dashboard.snapshot().map(ChartData::from_snapshot);
        let hz = u64::from(config.visualization.tui.refresh_hz.max(1));
        Self {
            dashboard,
            selected: Slider::ArrivalRate,
            show_steps: false,
            title: config.scenario.name.clone(),
            tick_rate: Duration::from_millis((1000 / hz).max(1)),
            loaded_path: None,
            should_quit: false,
            charts,
        }
    }

    /// Create the app from a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or fails validation.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> QueueResult<Self> {
        let config = DashboardConfig::load(&path)?;
        let mut app = Self::new(&config);
        app.loaded_path = Some(path.as_ref().display().to_string());
        Ok(app)
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        let changed = match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Left => self.dashboard.nudge(Slider::ArrivalRate, -1),
            KeyCode::Right => self.dashboard.nudge(Slider::ArrivalRate, 1),
            KeyCode::Down => self.dashboard.nudge(Slider::ServiceRate, -1),
            KeyCode::Up => self.dashboard.nudge(Slider::ServiceRate, 1),
            KeyCode::Tab => {
                self.selected = self.selected.toggle();
                false
            }
            KeyCode::Char('+' | '=') => self.dashboard.nudge(self.selected, 1),
            KeyCode::Char('-') => self.dashboard.nudge(self.selected, -1),
            KeyCode::Char('s') => {
                self.show_steps = !self.show_steps;
                false
            }
            KeyCode::Char('r') => self.dashboard.reset(),
            _ => false,
        };

        if changed {
            self.refresh();
        }
    }

    /// Recompute for the current sliders and rebuild the chart series.
    pub fn refresh(&mut self) {
        self.dashboard.refresh();
        self.charts = self.dashboard.snapshot().map(ChartData::from_snapshot);
    }

    /// Check if the app should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Latest snapshot, if the current inputs are stable.
    #[must_use]
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.dashboard.snapshot()
    }

    /// Error for the current inputs, if they have no steady state.
    #[must_use]
    pub fn error(&self) -> Option<&QueueError> {
        self.dashboard.error()
    }

    /// Chart series for the latest snapshot.
    #[must_use]
    pub const fn charts(&self) -> Option<&ChartData> {
        self.charts.as_ref()
    }

    /// Slider value as a fraction of its range, for gauges.
    #[must_use]
    pub fn slider_ratio(&self, slider: Slider) -> f64 {
        let (min, max) = self.dashboard.slider_range();
        let value = match slider {
            Slider::ArrivalRate => self.dashboard.arrival_rate(),
            Slider::ServiceRate => self.dashboard.service_rate(),
        };
        if max > min {
            f64::from(value - min) / f64::from(max - min)
        } else {
            1.0
        }
    }

    /// One-line status for the bottom bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        let rates = format!(
            "λ={} μ={}",
            self.dashboard.arrival_rate(),
            self.dashboard.service_rate()
        );
        match (self.snapshot(), self.error()) {
            (Some(s), _) => format!("{rates} | {}", s.health.describe(s.metrics.utilization)),
            (None, Some(e)) => format!("{rates} | {e}"),
            (None, None) => rates,
        }
    }
}
