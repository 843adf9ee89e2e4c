//! CLI argument parsing.
//!
//! Hand-rolled so the whole grammar stays testable from plain string slices.
//! Flags accept both `--flag value` and `--flag=value`.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
    /// The command to execute.
    pub command: Command,
}

/// Rates given on the command line; absent values come from the configured
/// slider defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateArgs {
    /// `--lambda`.
    pub lambda: Option<f64>,
    /// `--mu`.
    pub mu: Option<f64>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print steady-state metrics for (λ, μ).
    Compute {
        /// Rates.
        rates: RateArgs,
        /// Emit JSON instead of a report.
        json: bool,
    },
    /// Print the occupancy distribution P(n).
    Distribution {
        /// Utilization given directly with `--rho`.
        rho: Option<f64>,
        /// Rates to derive ρ from when `--rho` is absent.
        rates: RateArgs,
        /// Number of levels.
        max_n: Option<usize>,
        /// Emit JSON instead of a table.
        json: bool,
    },
    /// Print the wait-time sensitivity sweep.
    Sweep {
        /// Fixed service rate.
        mu: Option<f64>,
        /// Smallest sampled utilization.
        rho_min: Option<f64>,
        /// Largest sampled utilization.
        rho_max: Option<f64>,
        /// Number of samples.
        steps: Option<usize>,
        /// Emit JSON instead of a table.
        json: bool,
    },
    /// Print the full dashboard report.
    Dashboard {
        /// Rates.
        rates: RateArgs,
        /// Emit the snapshot as JSON.
        json: bool,
    },
    /// Start the web dashboard.
    Serve {
        /// Port override.
        port: Option<u16>,
    },
    /// Arguments could not be parsed.
    Invalid {
        /// What was wrong.
        message: String,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Flags collected before they are matched against a command.
#[derive(Debug, Default)]
struct Flags {
    lambda: Option<f64>,
    mu: Option<f64>,
    rho: Option<f64>,
    max_n: Option<usize>,
    rho_min: Option<f64>,
    rho_max: Option<f64>,
    steps: Option<usize>,
    port: Option<u16>,
    json: bool,
}

impl Flags {
    const fn rates(&self) -> RateArgs {
        RateArgs {
            lambda: self.lambda,
            mu: self.mu,
        }
    }
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    /// Internal parsing from a vector of strings.
    fn parse_from_vec(args: &[String]) -> Self {
        let mut config_path = None;
        let mut command_name: Option<&str> = None;
        let mut flags = Flags::default();

        let mut i = 1;
        while i < args.len() {
            let arg = args[i].as_str();
            let (name, inline) = match arg.split_once('=') {
                Some((n, v)) if n.starts_with("--") => (n, Some(v.to_string())),
                _ => (arg, None),
            };

            if !name.starts_with('-') || name == "-" {
                if command_name.is_none() {
                    command_name = Some(arg);
                    i += 1;
                    continue;
                }
                return Self::invalid(config_path, format!("unexpected argument '{arg}'"));
            }

            match name {
                "-h" | "--help" => command_name = command_name.or(Some("help")),
                "-V" | "--version" => command_name = command_name.or(Some("version")),
                "--json" => flags.json = true,
                _ => {
                    let value = match inline {
                        Some(v) => v,
                        None => {
                            i += 1;
                            match args.get(i) {
                                Some(v) => v.clone(),
                                None => {
                                    return Self::invalid(
                                        config_path,
                                        format!("'{name}' requires a value"),
                                    )
                                }
                            }
                        }
                    };
                    if let Err(message) = Self::apply_flag(name, &value, &mut flags, &mut config_path)
                    {
                        return Self::invalid(config_path, message);
                    }
                }
            }
            i += 1;
        }

        let command = match command_name.unwrap_or("help") {
            "compute" => Command::Compute {
                rates: flags.rates(),
                json: flags.json,
            },
            "distribution" => Command::Distribution {
                rho: flags.rho,
                rates: flags.rates(),
                max_n: flags.max_n,
                json: flags.json,
            },
            "sweep" => Command::Sweep {
                mu: flags.mu,
                rho_min: flags.rho_min,
                rho_max: flags.rho_max,
                steps: flags.steps,
                json: flags.json,
            },
            "dashboard" => Command::Dashboard {
                rates: flags.rates(),
                json: flags.json,
            },
            "serve" => Command::Serve { port: flags.port },
            "help" => Command::Help,
            "version" => Command::Version,
            unknown => Command::Invalid {
                message: format!("unknown command '{unknown}'"),
            },
        };

        Self {
            config_path,
            command,
        }
    }

    fn invalid(config_path: Option<PathBuf>, message: String) -> Self {
        Self {
            config_path,
            command: Command::Invalid { message },
        }
    }

    fn apply_flag(
        name: &str,
        value: &str,
        flags: &mut Flags,
        config_path: &mut Option<PathBuf>,
    ) -> Result<(), String> {
        match name {
            "--config" | "-c" => *config_path = Some(PathBuf::from(value)),
            "--lambda" => flags.lambda = Some(parse_value(name, value)?),
            "--mu" => flags.mu = Some(parse_value(name, value)?),
            "--rho" => flags.rho = Some(parse_value(name, value)?),
            "--max-n" => flags.max_n = Some(parse_value(name, value)?),
            "--rho-min" => flags.rho_min = Some(parse_value(name, value)?),
            "--rho-max" => flags.rho_max = Some(parse_value(name, value)?),
            "--steps" => flags.steps = Some(parse_value(name, value)?),
            "--port" => flags.port = Some(parse_value(name, value)?),
            unknown => return Err(format!("unknown option '{unknown}'")),
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value '{value}' for '{name}'"))
}
