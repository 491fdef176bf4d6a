//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{GateProfile, LEGACY_QUIET_WINDOW_MS};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    profile_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ProfileSummary>,
}

#[derive(Serialize)]
struct ProfileSummary {
    version: String,
    default_quiet_window_ms: u64,
    source_count: usize,
    disabled_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(profile = %args.profile.display(), "Validating profile");

    let result = validate_profile(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(CliError::invalid_profile(&args.profile).into())
    }
}

fn validate_profile(args: &ValidateArgs) -> ValidationResult {
    let profile_path = args.profile.display().to_string();

    if !args.profile.exists() {
        return ValidationResult {
            valid: false,
            profile_path,
            error: Some(format!("File not found: {}", args.profile.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.profile) {
        Ok(profile) => {
            let warnings = collect_warnings(&profile);
            ValidationResult {
                valid: true,
                profile_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ProfileSummary {
                    version: format!("{:?}", profile.version),
                    default_quiet_window_ms: profile.default_quiet_window_ms,
                    source_count: profile.sources.len(),
                    disabled_count: profile.sources.iter().filter(|s| !s.enabled).count(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            profile_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect profile warnings (non-fatal issues)
fn collect_warnings(profile: &GateProfile) -> Vec<String> {
    let mut warnings = Vec::new();

    if profile.sources.is_empty() {
        warnings.push("No sources declared - every source uses the default window".to_string());
    }

    if profile.default_quiet_window_ms == 0 {
        warnings.push("default_quiet_window_ms is 0 - undeclared sources are never debounced".to_string());
    }

    for source in &profile.sources {
        match source.quiet_window_ms {
            Some(0) => warnings.push(format!(
                "Source '{}' has a zero quiet window and is never debounced",
                source.id
            )),
            Some(ms) if ms > LEGACY_QUIET_WINDOW_MS * 5 => warnings.push(format!(
                "Source '{}' quiet window {}ms is unusually long",
                source.id, ms
            )),
            _ => {}
        }
        if !source.enabled {
            warnings.push(format!(
                "Source '{}' is disabled - its triggers will be rejected",
                source.id
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Profile is valid: {}", result.profile_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Default window: {}ms", summary.default_quiet_window_ms);
            println!("  Sources: {}", summary.source_count);
            if summary.disabled_count > 0 {
                println!("  Disabled: {}", summary.disabled_count);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Profile is invalid: {}", result.profile_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SourceConfig;
    use std::io::Write;

    #[test]
    fn test_warnings() {
        let profile = GateProfile {
            default_quiet_window_ms: 0,
            sources: vec![
                SourceConfig::new("fast").with_window_ms(0),
                SourceConfig::new("slow").with_window_ms(60_000),
                SourceConfig {
                    enabled: false,
                    ..SourceConfig::new("off")
                },
                SourceConfig::new("fine"),
            ],
            ..Default::default()
        };

        let warnings = collect_warnings(&profile);
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("'fast'")));
        assert!(warnings.iter().any(|w| w.contains("'slow'")));
        assert!(warnings.iter().any(|w| w.contains("'off'")));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "version = \"v1\"\n[[sources]]\nid = \"a\"\n[[sources]]\nid = \"a\"\n"
        )
        .unwrap();

        let args = ValidateArgs {
            profile: file.path().to_path_buf(),
            json: true,
        };
        let result = validate_profile(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("duplicate"));
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {
            profile: "/nonexistent/gates.toml".into(),
            json: false,
        };
        let result = validate_profile(&args);
        assert!(!result.valid);
        assert!(result.summary.is_none());
    }
}
