//! queuelab CLI - M/M/1 queue calculator
//!
//! Thin wrapper: logging setup, then `queuelab::cli::run_cli`.

use std::process::ExitCode;

use queuelab::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run_cli(Args::parse())
}
