//! End-to-end M/M/1 scenarios through the public API.

use queuelab::prelude::*;
use queuelab::queue::{occupancy_distribution, to_minutes, utilization_sweep};
use queuelab::visualization::{ExportFormat, Exporter};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

// Drive-thru at rush hour: λ = 30, μ = 35
#[test]
fn rush_hour_metrics() {
    let m = QueueMetricsCalculator::default()
        .compute(&QueueParameters::new(30.0, 35.0))
        .unwrap();

    assert!(close(m.utilization, 6.0 / 7.0, 1e-12));
    assert!(close(m.mean_in_system, 6.0, 1e-9));
    assert!(close(m.mean_in_queue, 36.0 / 7.0, 1e-9));
    assert!(close(m.mean_time_in_system, 0.2, 1e-12));
    assert!(close(to_minutes(m.mean_time_in_system), 12.0, 1e-9));
    assert!(close(m.mean_wait_in_queue, 6.0 / 35.0, 1e-12));
    assert!(close(to_minutes(m.mean_wait_in_queue), 10.285_714, 1e-5));
}

// Quiet afternoon: λ = 10, μ = 20
#[test]
fn half_utilization_metrics() {
    let m = QueueMetricsCalculator::default()
        .compute(&QueueParameters::new(10.0, 20.0))
        .unwrap();

    assert!(close(m.utilization, 0.5, 1e-12));
    assert!(close(m.mean_in_system, 1.0, 1e-12));
    assert!(close(m.mean_in_queue, 0.5, 1e-12));
    assert!(close(m.mean_time_in_system, 0.1, 1e-12));
    assert!(close(m.mean_wait_in_queue, 0.05, 1e-12));
}

#[test]
fn saturated_and_overloaded_are_unstable() {
    let calc = QueueMetricsCalculator::default();
    for (lambda, mu) in [(50.0, 50.0), (60.0, 40.0), (100.0, 1.0)] {
        let err = calc.compute(&QueueParameters::new(lambda, mu)).unwrap_err();
        assert!(err.is_unstable(), "λ={lambda} μ={mu}: {err}");
    }
}

#[test]
fn distribution_matches_metrics() {
    let calc = QueueMetricsCalculator::default();
    let m = calc.compute(&QueueParameters::new(10.0, 20.0)).unwrap();
    let d = calc.distribution_for(&m).unwrap();

    assert_eq!(d.len(), 15);
    assert!(close(d.probability(0).unwrap(), 0.5, 1e-12));
    assert!(close(d.probability(1).unwrap(), 0.25, 1e-12));
    // Truncated sum misses exactly ρ^15
    assert!(close(d.covered_mass() + d.tail_mass(), 1.0, 1e-12));
}

#[test]
fn distribution_rejects_full_utilization() {
    assert!(occupancy_distribution(1.0, 15).unwrap_err().is_unstable());
    assert!(occupancy_distribution(0.0, 0).unwrap().is_empty());
}

#[test]
fn sweep_hockey_stick() {
    let sweep = utilization_sweep(35.0, 0.01, 0.95, 100);
    assert_eq!(sweep.len(), 100);
    // Waits at 95% utilization dwarf those at 1%
    assert!(sweep.hockey_stick_ratio() > 1000.0);
}

#[test]
fn dashboard_session() {
    let mut dashboard = Dashboard::default();
    assert_eq!(
        dashboard.snapshot().map(|s| s.health),
        Some(HealthStatus::Critical)
    );

    // Hire help: μ 35 → 50
    dashboard.set(Slider::ServiceRate, 50);
    let g = dashboard.generation();
    let pending = dashboard.recompute();

    // Another move arrives before the first result is stored
    dashboard.set(Slider::ServiceRate, 60);
    assert!(!dashboard.accept(g, pending));

    dashboard.refresh();
    let snapshot = dashboard.snapshot().unwrap();
    assert!(close(snapshot.parameters.service_rate, 60.0, f64::EPSILON));
    assert_eq!(snapshot.health, HealthStatus::Healthy);

    let charts = ChartData::from_snapshot(snapshot);
    assert_eq!(charts.bars.len(), 15);
    assert_eq!(charts.line.len(), 100);
}

#[test]
fn snapshot_json_round_trip() {
    let dashboard = Dashboard::default();
    let snapshot = dashboard.snapshot().unwrap();
    let json = Exporter::with_format(ExportFormat::JsonPretty)
        .to_string(snapshot)
        .unwrap();
    let back: DashboardSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.generation, snapshot.generation);
    assert_eq!(back.health, snapshot.health);
    assert_eq!(back.recommendation, snapshot.recommendation);
    assert_eq!(back.distribution.len(), snapshot.distribution.len());
    assert!(close(back.metrics.mean_in_system, snapshot.metrics.mean_in_system, 1e-9));
}
