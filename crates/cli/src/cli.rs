//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tapgate - debounced trigger gates
#[derive(Parser, Debug)]
#[command(
    name = "tapgate",
    author,
    version,
    about = "Replay and inspect debounced trigger gates",
    long_about = "Loads a gate profile (per-source quiet windows) and replays recorded \n\
                  trigger traces through it, reporting which triggers fire and which \n\
                  are suppressed."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TAPGATE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TAPGATE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a recorded trigger trace through the gates
    Replay(ReplayArgs),

    /// Validate a gate profile without replaying anything
    Validate(ValidateArgs),

    /// Show the resolved quiet window of every source
    Info(InfoArgs),
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Gate profile (TOML or JSON). Without one, every source uses the default window.
    #[arg(short, long, env = "TAPGATE_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Trigger trace to replay (TOML or JSON)
    #[arg(short, long, env = "TAPGATE_TRACE")]
    pub trace: PathBuf,

    /// Quiet window in milliseconds for sources the profile doesn't declare (max 600000)
    #[arg(long, env = "TAPGATE_DEFAULT_WINDOW_MS")]
    pub default_window_ms: Option<u64>,

    /// Sleep between triggers as recorded instead of replaying instantly
    #[arg(long)]
    pub realtime: bool,

    /// Playback speed multiplier for --realtime
    #[arg(long, default_value = "1.0", requires = "realtime")]
    pub speed: f64,

    /// Output the replay report as JSON
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TAPGATE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Gate profile to validate
    #[arg(short, long, default_value = "gates.toml")]
    pub profile: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Gate profile
    #[arg(short, long, default_value = "gates.toml")]
    pub profile: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
