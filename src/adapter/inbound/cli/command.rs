//! Command-line interface definitions.
//!
//! Defines the CLI structure for the betslip application using `clap`: a
//! foreground `run` command that drives the live slip, and `check`
//! subcommands that validate inputs without starting anything.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Live bet-slip engine with a simulated odds feed
#[derive(Parser, Debug)]
#[command(name = "betslip")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the betslip CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load events and run the live odds feed against a bet slip
    Run(RunArgs),

    /// Validate inputs without running
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `betslip check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate a configuration file.
    Config(ConfigPathArg),
    /// Validate an event payload and summarize its catalogue.
    Events(EventsPathArg),
}

#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct EventsPathArg {
    /// Path to the JSON event payload
    #[arg(short, long)]
    pub events: PathBuf,
}

/// Arguments for `betslip run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the JSON event payload
    #[arg(short, long)]
    pub events: PathBuf,

    /// Override the configured log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Seed the odds engine for a reproducible feed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial stake
    #[arg(long)]
    pub stake: Option<f64>,

    /// Outcome to put on the slip at startup (repeatable)
    #[arg(long = "pick", value_name = "OUTCOME_ID")]
    pub picks: Vec<String>,

    /// Try to place the slip on shutdown
    #[arg(long)]
    pub place: bool,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<u64>,
}
