//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{duration_to_millis, GateProfile};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Profile info for JSON output
#[derive(Serialize)]
struct ProfileInfo {
    version: String,
    default_quiet_window_ms: u64,
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    id: String,
    quiet_window_ms: u64,
    /// Whether the window comes from the profile default
    inherited: bool,
    enabled: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(profile = %args.profile.display(), "Loading profile info");

    if !args.profile.exists() {
        return Err(CliError::profile_not_found(&args.profile).into());
    }

    let profile = config_loader::ConfigLoader::load_from_path(&args.profile)
        .with_context(|| format!("Failed to load profile from {}", args.profile.display()))?;

    let info = build_profile_info(&profile);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize profile info")?;
        println!("{}", json);
    } else {
        print_profile_info(&info);
    }

    Ok(())
}

fn build_profile_info(profile: &GateProfile) -> ProfileInfo {
    let sources = profile
        .sources
        .iter()
        .zip(profile.resolved())
        .map(|(config, (id, window, enabled))| SourceInfo {
            id: id.to_string(),
            quiet_window_ms: duration_to_millis(window),
            inherited: config.quiet_window_ms.is_none(),
            enabled,
        })
        .collect();

    ProfileInfo {
        version: format!("{:?}", profile.version),
        default_quiet_window_ms: profile.default_quiet_window_ms,
        sources,
    }
}

fn print_profile_info(info: &ProfileInfo) {
    println!("Gate profile ({})", info.version);
    println!("   Default window: {}ms", info.default_quiet_window_ms);

    println!("\nSources ({})", info.sources.len());
    for (i, source) in info.sources.iter().enumerate() {
        let prefix = if i == info.sources.len() - 1 { "└─" } else { "├─" };
        let origin = if source.inherited { " (default)" } else { "" };
        let state = if source.enabled { "" } else { " [disabled]" };
        println!(
            "   {} {}: {}ms{}{}",
            prefix, source.id, source.quiet_window_ms, origin, state
        );
    }

    println!();
}
