//! # queuelab
//!
//! Interactive M/M/1 queue calculator.
//!
//! Given an arrival rate λ and a service rate μ (customers per hour), the
//! library derives the steady-state utilization, queue lengths and waiting
//! times, the probability of finding n customers in the system, and how the
//! expected wait responds as utilization climbs toward 1. A reactive
//! [`dashboard::Dashboard`] recomputes all of it whenever a slider moves;
//! the CLI, the terminal dashboard and the web endpoint are thin displays
//! over the same calls.
//!
//! ## Example
//!
//! ```rust
//! use queuelab::prelude::*;
//!
//! let calc = QueueMetricsCalculator::default();
//! let metrics = calc.compute(&QueueParameters::new(30.0, 35.0)).expect("stable");
//! assert!((metrics.mean_in_system - 6.0).abs() < 1e-9);
//!
//! let unstable = calc.compute(&QueueParameters::new(50.0, 50.0));
//! assert!(unstable.is_err_and(|e| e.is_unstable()));
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,
)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod queue;
#[cfg(feature = "tui")]
pub mod tui;
pub mod visualization;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{DashboardConfig, DashboardConfigBuilder};
    pub use crate::dashboard::{Dashboard, DashboardSnapshot, Slider};
    pub use crate::error::{QueueError, QueueResult};
    pub use crate::queue::{
        HealthStatus, HealthThresholds, OccupancyDistribution, QueueMetrics,
        QueueMetricsCalculator, QueueParameters, UtilizationSweep,
    };
    pub use crate::visualization::ChartData;
}

/// Re-export for public API
pub use error::{QueueError, QueueResult};
