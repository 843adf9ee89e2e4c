//! Integration tests for TUI module.
//!
//! These tests drive the dashboard app through whole sessions of key presses.

use super::dashboard_app::DashboardApp;
use crate::config::DashboardConfig;
use crate::queue::HealthStatus;
use crossterm::event::KeyCode;
use std::io::Write;

#[test]
fn test_dashboard_app_lifecycle() {
    let mut app = DashboardApp::default();

    // Initial state: the rush-hour defaults are critical
    assert!(!app.should_quit());
    let initial = app.snapshot().map(|s| s.health);
    assert_eq!(initial, Some(HealthStatus::Critical));

    // Speed up service until healthy
    for _ in 0..10 {
        app.handle_key(KeyCode::Up);
    }
    // λ = 30, μ = 45: ρ ≈ 0.667
    assert_eq!(app.snapshot().map(|s| s.health), Some(HealthStatus::Healthy));

    // Push arrivals past service, then back
    for _ in 0..20 {
        app.handle_key(KeyCode::Right);
    }
    assert!(app.snapshot().is_none());
    assert!(app.error().is_some());
    for _ in 0..20 {
        app.handle_key(KeyCode::Left);
    }
    assert!(app.snapshot().is_some());
    assert!(app.dashboard.is_current());

    // Reset and quit
    app.handle_key(KeyCode::Char('r'));
    assert_eq!(app.dashboard.arrival_rate(), 30);
    app.handle_key(KeyCode::Char('q'));
    assert!(app.should_quit());
}

#[test]
fn test_sliders_stop_at_range_ends() {
    let mut app = DashboardApp::default();
    for _ in 0..200 {
        app.handle_key(KeyCode::Up);
    }
    assert_eq!(app.dashboard.service_rate(), 100);
    for _ in 0..200 {
        app.handle_key(KeyCode::Left);
    }
    assert_eq!(app.dashboard.arrival_rate(), 1);
    assert!(app.snapshot().is_some());
}

#[test]
fn test_app_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "scenario:\n  name: Drive-through\ndefaults:\n  arrival_rate: 10\n  service_rate: 20\ndistribution:\n  max_n: 8"
    )
    .expect("write");

    let app = DashboardApp::from_yaml_file(file.path()).expect("valid config");
    assert_eq!(app.title, "Drive-through");
    assert!(app.loaded_path.is_some());
    let snapshot = app.snapshot().expect("stable");
    assert_eq!(snapshot.distribution.len(), 8);
    assert!((snapshot.metrics.utilization - 0.5).abs() < 1e-12);
}

#[test]
fn test_app_from_bad_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "sweep:\n  rho_max: 1.0").expect("write");
    assert!(DashboardApp::from_yaml_file(file.path()).is_err());
}

#[test]
fn test_custom_refresh_rate() {
    let mut config = DashboardConfig::default();
    config.visualization.tui.refresh_hz = 10;
    let app = DashboardApp::new(&config);
    assert_eq!(app.tick_rate.as_millis(), 100);
}

#[test]
fn test_tick_rate_never_zero() {
    let mut config = DashboardConfig::default();
    config.visualization.tui.refresh_hz = 5000;
    let app = DashboardApp::new(&config);
    assert_eq!(app.tick_rate.as_millis(), 1);
}
