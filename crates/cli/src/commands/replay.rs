//! `replay` command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, TraceLoader};
use contracts::{GateProfile, MAX_QUIET_WINDOW_MS};
use tracing::{info, warn};

use crate::cli::ReplayArgs;
use crate::error::CliError;
use crate::replay::{Replay, ReplayOptions, ReplayReport};

/// Execute the `replay` command
pub async fn run_replay(args: &ReplayArgs) -> Result<()> {
    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let undeclared_window = resolve_undeclared_window(args.default_window_ms)?;

    let profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => {
            info!("No profile given, every source uses the default window");
            GateProfile::default()
        }
    };

    if !args.trace.exists() {
        return Err(CliError::trace_not_found(&args.trace).into());
    }
    let trace = TraceLoader::load_from_path(&args.trace)
        .with_context(|| format!("Failed to load trace from {}", args.trace.display()))?;

    info!(
        trace = %args.trace.display(),
        triggers = trace.len(),
        duration = ?trace.duration(),
        realtime = args.realtime,
        "Replaying trace"
    );

    let options = ReplayOptions {
        realtime: args.realtime,
        speed: args.speed,
        undeclared_window,
    };
    let replay = Replay::new(profile, trace, options);

    let report = if args.realtime {
        tokio::select! {
            report = replay.run() => report,
            _ = shutdown_signal() => {
                warn!("Interrupted, replay aborted");
                return Ok(());
            }
        }
    } else {
        replay.run().await
    };

    output(&report, args.json)
}

/// `--default-window-ms`, held to the same bound as profile windows
fn resolve_undeclared_window(ms: Option<u64>) -> Result<Option<Duration>, CliError> {
    match ms {
        Some(ms) if ms > MAX_QUIET_WINDOW_MS => Err(CliError::WindowOutOfRange {
            value_ms: ms,
            max_ms: MAX_QUIET_WINDOW_MS,
        }),
        other => Ok(other.map(Duration::from_millis)),
    }
}

fn load_profile(path: &Path) -> Result<GateProfile> {
    if !path.exists() {
        return Err(CliError::profile_not_found(path).into());
    }
    ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load profile from {}", path.display()))
}

fn output(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        let json = report.to_json().context("Failed to serialize replay report")?;
        println!("{}", json);
    } else {
        report.print();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}
