//! CLI module tests.

use super::args::{Args, Command, RateArgs};
use super::commands::{exit_code, load_config, run_cli, run_distribution, run_sweep};
use super::output::{render_dashboard, render_distribution, render_metrics, render_sweep, render_version};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::QueueError;
use crate::queue::{
    occupancy_distribution, utilization_sweep, HealthStatus, QueueMetricsCalculator,
    QueueParameters, SweepGrid,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_shows_help() {
    let args = Args::parse_from(["queuelab"]);
    assert_eq!(args.command, Command::Help);
    assert!(args.config_path.is_none());
}

#[test]
fn test_parse_help_and_version_flags() {
    assert_eq!(Args::parse_from(["queuelab", "-h"]).command, Command::Help);
    assert_eq!(Args::parse_from(["queuelab", "--help"]).command, Command::Help);
    assert_eq!(Args::parse_from(["queuelab", "help"]).command, Command::Help);
    assert_eq!(Args::parse_from(["queuelab", "-V"]).command, Command::Version);
    assert_eq!(Args::parse_from(["queuelab", "version"]).command, Command::Version);
}

#[test]
fn test_parse_compute() {
    let args = Args::parse_from(["queuelab", "compute", "--lambda", "30", "--mu", "35"]);
    assert_eq!(
        args.command,
        Command::Compute {
            rates: RateArgs {
                lambda: Some(30.0),
                mu: Some(35.0),
            },
            json: false,
        }
    );
}

#[test]
fn test_parse_inline_values_and_json() {
    let args = Args::parse_from(["queuelab", "compute", "--lambda=10", "--mu=20.5", "--json"]);
    assert_eq!(
        args.command,
        Command::Compute {
            rates: RateArgs {
                lambda: Some(10.0),
                mu: Some(20.5),
            },
            json: true,
        }
    );
}

#[test]
fn test_parse_compute_defaults_to_config() {
    let args = Args::parse_from(["queuelab", "compute"]);
    assert_eq!(
        args.command,
        Command::Compute {
            rates: RateArgs::default(),
            json: false,
        }
    );
}

#[test]
fn test_parse_config_before_command() {
    let args = Args::parse_from(["queuelab", "--config", "dash.yaml", "dashboard"]);
    assert_eq!(args.config_path, Some(PathBuf::from("dash.yaml")));
    assert!(matches!(args.command, Command::Dashboard { .. }));

    let args = Args::parse_from(["queuelab", "dashboard", "-c", "other.yaml"]);
    assert_eq!(args.config_path, Some(PathBuf::from("other.yaml")));
}

#[test]
fn test_parse_distribution() {
    let args = Args::parse_from(["queuelab", "distribution", "--rho", "0.5", "--max-n", "10"]);
    assert_eq!(
        args.command,
        Command::Distribution {
            rho: Some(0.5),
            rates: RateArgs::default(),
            max_n: Some(10),
            json: false,
        }
    );
}

#[test]
fn test_parse_sweep() {
    let args = Args::parse_from([
        "queuelab", "sweep", "--mu", "20", "--rho-min", "0.1", "--rho-max", "0.9", "--steps", "9",
    ]);
    assert_eq!(
        args.command,
        Command::Sweep {
            mu: Some(20.0),
            rho_min: Some(0.1),
            rho_max: Some(0.9),
            steps: Some(9),
            json: false,
        }
    );
}

#[test]
fn test_parse_serve_port() {
    let args = Args::parse_from(["queuelab", "serve", "--port", "9000"]);
    assert_eq!(args.command, Command::Serve { port: Some(9000) });
}

#[test]
fn test_parse_negative_rate_is_accepted_by_parser() {
    let args = Args::parse_from(["queuelab", "compute", "--lambda", "-5"]);
    assert!(matches!(
        args.command,
        Command::Compute {
            rates: RateArgs {
                lambda: Some(l),
                ..
            },
            ..
        } if (l + 5.0).abs() < f64::EPSILON
    ));
}

#[test]
fn test_parse_errors() {
    for argv in [
        vec!["queuelab", "frobnicate"],
        vec!["queuelab", "compute", "--lambda"],
        vec!["queuelab", "compute", "--lambda", "fast"],
        vec!["queuelab", "compute", "--bogus", "1"],
        vec!["queuelab", "compute", "extra"],
        vec!["queuelab", "serve", "--port", "70000"],
    ] {
        let args = Args::parse_from(&argv);
        assert!(
            matches!(args.command, Command::Invalid { .. }),
            "{argv:?} -> {:?}",
            args.command
        );
    }
}

// ============================================================================
// Exit codes
// ============================================================================

#[test]
fn test_run_cli_success() {
    assert_eq!(run_cli(Args::parse_from(["queuelab", "help"])), ExitCode::SUCCESS);
    assert_eq!(run_cli(Args::parse_from(["queuelab", "version"])), ExitCode::SUCCESS);
    assert_eq!(
        run_cli(Args::parse_from(["queuelab", "compute", "--lambda", "10", "--mu", "20"])),
        ExitCode::SUCCESS
    );
    assert_eq!(
        run_cli(Args::parse_from(["queuelab", "dashboard", "--json"])),
        ExitCode::SUCCESS
    );
}

#[test]
fn test_run_cli_unstable_exits_one() {
    let exit = run_cli(Args::parse_from(["queuelab", "compute", "--lambda", "50", "--mu", "50"]));
    assert_eq!(exit, ExitCode::from(1));
}

#[test]
fn test_run_cli_invalid_args_exit_one() {
    let exit = run_cli(Args::parse_from(["queuelab", "compute", "--lambda", "fast"]));
    assert_eq!(exit, ExitCode::from(1));

    let exit = run_cli(Args::parse_from(["queuelab", "sweep", "--rho-max", "1.0"]));
    assert_eq!(exit, ExitCode::from(1));
}

#[test]
fn test_run_cli_missing_config_exits_two() {
    let exit = run_cli(Args::parse_from([
        "queuelab",
        "--config",
        "/nonexistent/queuelab.yaml",
        "compute",
    ]));
    assert_eq!(exit, ExitCode::from(2));
}

#[test]
fn test_run_cli_bad_config_exits_two() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "health:\n  warning: 0.9\n  critical: 0.8").expect("write");
    let path = file.path().to_string_lossy().to_string();

    let exit = run_cli(Args::parse_from(["queuelab", "--config", &path, "dashboard"]));
    assert_eq!(exit, ExitCode::from(2));
}

#[test]
fn test_exit_code_mapping() {
    assert_eq!(exit_code(&QueueError::unstable(1.0)), 1);
    assert_eq!(exit_code(&QueueError::invalid("mu", 0.0, "must be positive")), 1);
    assert_eq!(exit_code(&QueueError::config("bad")), 2);
    assert_eq!(exit_code(&QueueError::io("disk")), 1);
}

#[test]
fn test_load_config_defaults_and_file() {
    let config = load_config(None).expect("defaults");
    assert_eq!(config.defaults.arrival_rate, 30);

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "defaults:\n  arrival_rate: 12\n  service_rate: 40").expect("write");
    let config = load_config(Some(file.path())).expect("valid");
    assert_eq!(config.defaults.arrival_rate, 12);

    let err = load_config(Some(std::path::Path::new("/nonexistent.yaml"))).expect_err("missing");
    assert!(matches!(err, QueueError::Config { .. }));
}

// ============================================================================
// Command handlers
// ============================================================================

#[test]
fn test_distribution_from_rates() {
    let config = DashboardConfig::default();
    let rates = RateArgs {
        lambda: Some(10.0),
        mu: Some(20.0),
    };
    assert!(run_distribution(&config, None, rates, Some(5), true).is_ok());

    let err = run_distribution(&config, Some(1.2), RateArgs::default(), None, false)
        .expect_err("ρ ≥ 1");
    assert!(err.is_unstable());
}

#[test]
fn test_distribution_rejects_oversized_max_n() {
    let config = DashboardConfig::default();
    let err = run_distribution(&config, Some(0.5), RateArgs::default(), Some(usize::MAX), true)
        .expect_err("too many levels");
    assert!(matches!(err, QueueError::InvalidParameter { name: "max_n", .. }));

    let exit = run_cli(Args::parse_from([
        "queuelab",
        "distribution",
        "--rho",
        "0.5",
        "--max-n",
        "18446744073709551615",
    ]));
    assert_eq!(exit, ExitCode::from(1));
}

#[test]
fn test_sweep_rejects_bad_grid() {
    let grid = SweepGrid {
        rho_min: 0.9,
        rho_max: 0.2,
        ..SweepGrid::default()
    };
    let err = run_sweep(&grid, false).expect_err("inverted grid");
    assert!(matches!(err, QueueError::InvalidParameter { .. }));
    assert!(run_sweep(&SweepGrid { steps: 3, ..SweepGrid::default() }, true).is_ok());
}

// ============================================================================
// Output tests
// ============================================================================

#[test]
fn test_render_version() {
    assert!(render_version().starts_with("queuelab "));
}

#[test]
fn test_render_metrics() {
    let params = QueueParameters::new(30.0, 35.0);
    let metrics = QueueMetricsCalculator::default()
        .compute(&params)
        .expect("stable");
    let text = render_metrics(&params, &metrics, HealthStatus::Critical);

    assert!(text.contains("Critical (85.7%)"), "{text}");
    assert!(text.contains("6.0000 customers"), "{text}");
    assert!(text.contains("12.00 min"), "{text}");
    assert!(text.contains("10.29 min"), "{text}");
    // 1/35 h
    assert!(text.contains("1.71 min"), "{text}");
    assert!(
        text.lines()
            .any(|l| l.contains("P(wait)") && l.trim_end().ends_with("85.7%")),
        "{text}"
    );
}

#[test]
fn test_render_distribution() {
    let dist = occupancy_distribution(0.5, 4).expect("stable");
    let text = render_distribution(&dist);
    assert!(text.contains("50.00%"), "{text}");
    assert!(text.contains("6.25%"), "{text}");
    assert!(text.contains("P(n ≥ 4)"), "{text}");
    // 1 - 0.5^4
    assert!(text.contains("93.75%"), "{text}");
}

#[test]
fn test_render_sweep() {
    let sweep = utilization_sweep(1.0, 0.5, 0.95, 2);
    let text = render_sweep(&sweep);
    assert!(text.contains("0.5000"), "{text}");
    assert!(text.contains("0.9500"), "{text}");
    assert!(text.contains("19.0x"), "{text}");
}

#[test]
fn test_render_dashboard() {
    let dashboard = Dashboard::default();
    let text = render_dashboard(dashboard.snapshot().expect("stable"));
    assert!(text.contains("10.3 minutes in line"), "{text}");
    assert!(text.contains("Waiting in line"), "{text}");
    assert!(text.contains("ρ = 30 / 35 = 0.86"), "{text}");
    assert!(text.contains("P(0) = 14.3%"), "{text}");
}
