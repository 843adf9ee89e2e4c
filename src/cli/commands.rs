//! CLI command handlers.
//!
//! Each handler returns `QueueResult<()>`; [`run_cli`] maps the error kind
//! onto the process exit code.

use std::path::Path;
use std::process::ExitCode;

use crate::config::DashboardConfig;
use crate::dashboard::DashboardSnapshot;
use crate::error::{QueueError, QueueResult};
use crate::queue::{HealthStatus, QueueMetricsCalculator, QueueParameters, SweepGrid};
use crate::visualization::{ExportFormat, Exporter};

use super::args::RateArgs;
use super::output::{
    print_dashboard, print_distribution, print_help, print_metrics, print_sweep, print_version,
};
use super::{Args, Command};

/// Exit code for unstable or invalid input.
pub const EXIT_INPUT: u8 = 1;
/// Exit code for configuration errors.
pub const EXIT_CONFIG: u8 = 2;

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    if let Command::Invalid { message } = &args.command {
        eprintln!("Error: {message}\n");
        print_help();
        return ExitCode::from(EXIT_INPUT);
    }

    let config = match load_config(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(exit_code(&e));
        }
    };

    let result = match args.command {
        Command::Compute { rates, json } => run_compute(&config, rates, json),
        Command::Distribution {
            rho,
            rates,
            max_n,
            json,
        } => run_distribution(&config, rho, rates, max_n, json),
        Command::Sweep {
            mu,
            rho_min,
            rho_max,
            steps,
            json,
        } => {
            let base = config.sweep.grid();
            let grid = SweepGrid {
                service_rate: mu.unwrap_or(base.service_rate),
                rho_min: rho_min.unwrap_or(base.rho_min),
                rho_max: rho_max.unwrap_or(base.rho_max),
                steps: steps.unwrap_or(base.steps),
            };
            run_sweep(&grid, json)
        }
        Command::Dashboard { rates, json } => run_dashboard(&config, rates, json),
        Command::Serve { port } => run_serve(config, port),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
        Command::Invalid { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit code for an error: 2 for configuration problems, 1 otherwise.
#[must_use]
pub const fn exit_code(err: &QueueError) -> u8 {
    match err {
        QueueError::Config { .. } | QueueError::YamlParse(_) | QueueError::Validation(_) => {
            EXIT_CONFIG
        }
        _ => EXIT_INPUT,
    }
}

/// Load the configuration file, or the defaults when none is given.
///
/// A missing or unreadable file counts as a configuration error.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or is invalid.
pub fn load_config(path: Option<&Path>) -> QueueResult<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    DashboardConfig::load(path).map_err(|e| match e {
        QueueError::Io(io) => {
            QueueError::config(format!("cannot read '{}': {io}", path.display()))
        }
        other => other,
    })
}

fn resolve_rates(config: &DashboardConfig, rates: RateArgs) -> QueueParameters {
    let defaults = config.initial_parameters();
    QueueParameters::new(
        rates.lambda.unwrap_or(defaults.arrival_rate),
        rates.mu.unwrap_or(defaults.service_rate),
    )
}

fn print_json<T: serde::Serialize>(value: &T) -> QueueResult<()> {
    println!(
        "{}",
        Exporter::with_format(ExportFormat::JsonPretty).to_string(value)?
    );
    Ok(())
}

/// Print steady-state metrics.
///
/// # Errors
///
/// `Unstable` if μ ≤ λ, `InvalidParameter` for non-positive rates.
pub fn run_compute(config: &DashboardConfig, rates: RateArgs, json: bool) -> QueueResult<()> {
    let params = resolve_rates(config, rates);
    let metrics = QueueMetricsCalculator::from_config(config).compute(&params)?;
    if json {
        print_json(&metrics)
    } else {
        let health = HealthStatus::classify(metrics.utilization, &config.thresholds());
        print_metrics(&params, &metrics, health);
        Ok(())
    }
}

/// Print the occupancy distribution for `--rho`, or for λ/μ.
///
/// # Errors
///
/// `Unstable` if ρ ≥ 1, `InvalidParameter` for bad inputs.
pub fn run_distribution(
    config: &DashboardConfig,
    rho: Option<f64>,
    rates: RateArgs,
    max_n: Option<usize>,
    json: bool,
) -> QueueResult<()> {
    let calc = QueueMetricsCalculator::from_config(config);
    let rho = match rho {
        Some(rho) => rho,
        None => calc.compute(&resolve_rates(config, rates))?.utilization,
    };
    let dist = calc.occupancy_distribution(rho, max_n.unwrap_or(calc.max_n))?;
    if json {
        print_json(&dist)
    } else {
        print_distribution(&dist);
        Ok(())
    }
}

/// Print the sweep over `grid`.
///
/// # Errors
///
/// `InvalidParameter` if the grid leaves 0 < ρ_min ≤ ρ_max < 1 or μ ≤ 0.
pub fn run_sweep(grid: &SweepGrid, json: bool) -> QueueResult<()> {
    grid.check()?;
    let sweep = crate::queue::utilization_sweep(
        grid.service_rate,
        grid.rho_min,
        grid.rho_max,
        grid.steps,
    );
    if json {
        print_json(&sweep)
    } else {
        print_sweep(&sweep);
        Ok(())
    }
}

/// Print the full dashboard report.
///
/// # Errors
///
/// `Unstable` if μ ≤ λ, `InvalidParameter` for non-positive rates.
pub fn run_dashboard(config: &DashboardConfig, rates: RateArgs, json: bool) -> QueueResult<()> {
    let snapshot = DashboardSnapshot::compute(
        &QueueMetricsCalculator::from_config(config),
        &config.thresholds(),
        resolve_rates(config, rates),
        0,
    )?;
    if json {
        print_json(&snapshot)
    } else {
        print_dashboard(&snapshot);
        Ok(())
    }
}

/// Start the web dashboard and block until it stops.
///
/// # Errors
///
/// Returns error if the runtime cannot start or the address cannot be bound.
#[cfg(feature = "web")]
pub fn run_serve(mut config: DashboardConfig, port: Option<u16>) -> QueueResult<()> {
    if let Some(port) = port {
        config.visualization.web.port = port;
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crate::visualization::serve(config))
}

/// Start the web dashboard and block until it stops.
///
/// # Errors
///
/// Always fails: this build has no web front end.
#[cfg(not(feature = "web"))]
pub fn run_serve(_config: DashboardConfig, _port: Option<u16>) -> QueueResult<()> {
    Err(QueueError::io(
        "web feature not enabled. Rebuild with: cargo build --features web",
    ))
}
