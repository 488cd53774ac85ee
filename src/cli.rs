// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `capflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "capflow",
    version,
    about = "Run a capability-gated task plan to settlement.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the plan file (TOML).
    ///
    /// Default: `Capflow.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Capflow.toml")]
    pub config: String,

    /// Override the plan's round ceiling.
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Treat tasks that never became ready as a hard error.
    ///
    /// By default an unsatisfied remainder is only reported; some plans
    /// deliberately carry optional tasks.
    #[arg(long)]
    pub strict: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CAPFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the plan, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
