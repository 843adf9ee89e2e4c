//! TUI module for queuelab.
//!
//! Holds the terminal dashboard's state and key handling so they can be
//! tested without a terminal. Drawing and terminal I/O live in the
//! `queue_tui` binary.

pub mod dashboard_app;

pub use dashboard_app::DashboardApp;

#[cfg(test)]
mod tests;
