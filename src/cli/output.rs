//! CLI output formatting.
//!
//! Every report is built as a `String` by a `render_*` function and printed
//! by its `print_*` counterpart, so tests can inspect the text.

use std::fmt::Write as _;

use crate::dashboard::DashboardSnapshot;
use crate::queue::{
    to_minutes, CalculationSteps, HealthStatus, OccupancyDistribution, QueueMetrics,
    QueueParameters, UtilizationSweep,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Width of the widest histogram bar in the distribution table.
const BAR_WIDTH: f64 = 40.0;

/// Print version information.
pub fn print_version() {
    println!("{}", render_version());
}

/// Version string, with the build's git hash when known.
#[must_use]
pub fn render_version() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            let short = hash.get(..8).unwrap_or(hash);
            format!("queuelab {} ({short})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("queuelab {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"queuelab - Interactive M/M/1 queue calculator

USAGE:
    queuelab [--config <FILE>] <COMMAND> [OPTIONS]

COMMANDS:
    compute                     Steady-state metrics for one (λ, μ)
        --lambda <RATE>         Arrival rate (default from config: 30)
        --mu <RATE>             Service rate (default from config: 35)

    distribution                Probability of n customers in the system
        --rho <UTIL>            Utilization (otherwise λ/μ)
        --lambda, --mu          Rates to derive the utilization from
        --max-n <N>             Number of levels (default: 15)

    sweep                       Wait in line as utilization approaches 1
        --mu <RATE>             Fixed service rate (default: 35)
        --rho-min <UTIL>        First sampled utilization (default: 0.01)
        --rho-max <UTIL>        Last sampled utilization, below 1 (default: 0.95)
        --steps <N>             Number of samples (default: 100)

    dashboard                   Full report: health, metrics, breakdown, steps
        --lambda, --mu          Rates

    serve                       Start the web dashboard (feature 'web')
        --port <PORT>           Port override (default: 8080)

    help                        Show this help message
    version                     Show version information

GLOBAL OPTIONS:
    -c, --config <FILE>         YAML configuration file
    --json                      Emit JSON instead of a report

EXIT CODES:
    0  success
    1  unstable queue (μ ≤ λ) or invalid input
    2  configuration error

EXAMPLES:
    queuelab compute --lambda 30 --mu 35
    queuelab distribution --rho 0.5 --max-n 10
    queuelab sweep --mu 20 --rho-max 0.9 --steps 10 --json
    queuelab --config rush_hour.yaml dashboard
"
    );
}

fn header(title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "╔═══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(out, "║ {title:<61} ║");
    let _ = writeln!(out, "╚═══════════════════════════════════════════════════════════════╝");
    out
}

/// Steady-state metrics report.
#[must_use]
pub fn render_metrics(
    params: &QueueParameters,
    metrics: &QueueMetrics,
    health: HealthStatus,
) -> String {
    let mut out = header("queuelab - M/M/1 Steady State");
    let _ = writeln!(
        out,
        "\nArrival rate λ: {} /h    Service rate μ: {} /h\n",
        params.arrival_rate, params.service_rate
    );
    let _ = writeln!(out, "{}", health.describe(metrics.utilization));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  Utilization ρ        {:>10.4}", metrics.utilization);
    let _ = writeln!(out, "  In system L          {:>10.4} customers", metrics.mean_in_system);
    let _ = writeln!(out, "  In line Lq           {:>10.4} customers", metrics.mean_in_queue);
    let _ = writeln!(
        out,
        "  Time in system W     {:>10.4} h  ({:.2} min)",
        metrics.mean_time_in_system,
        to_minutes(metrics.mean_time_in_system)
    );
    let _ = writeln!(
        out,
        "  Wait in line Wq      {:>10.4} h  ({:.2} min)",
        metrics.mean_wait_in_queue,
        to_minutes(metrics.mean_wait_in_queue)
    );
    let _ = writeln!(
        out,
        "  Service time 1/μ     {:>10.4} h  ({:.2} min)",
        metrics.mean_service_time(),
        to_minutes(metrics.mean_service_time())
    );
    let _ = writeln!(
        out,
        "  P(wait)              {:>9.1}%",
        metrics.probability_of_waiting() * 100.0
    );
    let _ = write!(out, "{RULE}");
    out
}

/// Print steady-state metrics.
pub fn print_metrics(params: &QueueParameters, metrics: &QueueMetrics, health: HealthStatus) {
    println!("{}", render_metrics(params, metrics, health));
}

/// Occupancy distribution table with a text histogram.
#[must_use]
pub fn render_distribution(dist: &OccupancyDistribution) -> String {
    let mut out = header("queuelab - Occupancy Distribution P(n)");
    let _ = writeln!(out, "\nρ = {:.4}\n", dist.utilization);
    let _ = writeln!(out, "   n      P(n)");
    let peak = dist.iter().map(|(_, p)| p).fold(0.0, f64::max);
    for (n, p) in dist.iter() {
        let width = if peak > 0.0 {
            (p / peak * BAR_WIDTH).round() as usize
        } else {
            0
        };
        let _ = writeln!(out, "{n:>4}  {:>6.2}%  {}", p * 100.0, "█".repeat(width));
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "  Shown mass:          {:.2}%",
        dist.covered_mass() * 100.0
    );
    let _ = write!(
        out,
        "  P(n ≥ {}):           {:.2}%",
        dist.len(),
        dist.tail_mass() * 100.0
    );
    out
}

/// Print the occupancy distribution.
pub fn print_distribution(dist: &OccupancyDistribution) {
    println!("{}", render_distribution(dist));
}

/// Sensitivity sweep table.
#[must_use]
pub fn render_sweep(sweep: &UtilizationSweep) -> String {
    let mut out = header("queuelab - Wait Time vs. Utilization");
    let _ = writeln!(out, "\nFixed service rate μ = {} /h\n", sweep.service_rate);
    let _ = writeln!(out, "      ρ        Wq (h)     Wq (min)");
    for p in &sweep.points {
        let _ = writeln!(
            out,
            "  {:>6.4}  {:>10.5}  {:>10.2}",
            p.utilization,
            p.wait_in_queue,
            to_minutes(p.wait_in_queue)
        );
    }
    let _ = writeln!(out, "{RULE}");
    let _ = write!(
        out,
        "  Last/first wait ratio: {:.1}x",
        sweep.hockey_stick_ratio()
    );
    out
}

/// Print the sensitivity sweep.
pub fn print_sweep(sweep: &UtilizationSweep) {
    println!("{}", render_sweep(sweep));
}

fn render_steps(out: &mut String, steps: &CalculationSteps) {
    let _ = writeln!(out, "\nCalculation:");
    for step in steps.iter() {
        let _ = writeln!(out, "  {step}");
    }
}

/// Full dashboard report.
#[must_use]
pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = render_metrics(&snapshot.parameters, &snapshot.metrics, snapshot.health);
    let _ = writeln!(out, "\n\n{}", snapshot.recommendation);

    let c = &snapshot.composition;
    let _ = writeln!(out, "\nTime in system ({:.2} min):", c.total_minutes());
    let _ = writeln!(
        out,
        "  Waiting in line   {:>7.2} min  {:>5.1}%",
        c.waiting_minutes,
        c.waiting_share() * 100.0
    );
    let _ = writeln!(
        out,
        "  Being served      {:>7.2} min  {:>5.1}%",
        c.service_minutes,
        c.service_share() * 100.0
    );

    render_steps(&mut out, &snapshot.steps);

    let _ = write!(
        out,
        "\nP(0) = {:.1}%   P(n ≥ {}) = {:.1}%",
        snapshot.metrics.probability_idle() * 100.0,
        snapshot.distribution.len(),
        snapshot.distribution.tail_mass() * 100.0
    );
    out
}

/// Print the full dashboard report.
pub fn print_dashboard(snapshot: &DashboardSnapshot) {
    println!("{}", render_dashboard(snapshot));
}
