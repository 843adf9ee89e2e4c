//! CLI module for queuelab.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RateArgs};
pub use commands::{
    exit_code, load_config, run_cli, run_compute, run_dashboard, run_distribution, run_sweep,
    EXIT_CONFIG, EXIT_INPUT,
};
pub use output::{
    print_dashboard, print_distribution, print_help, print_metrics, print_sweep, print_version,
    render_dashboard, render_distribution, render_metrics, render_sweep, render_version,
};

#[cfg(test)]
mod tests;
