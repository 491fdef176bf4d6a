//! # Config Loader
//!
//! Loads gate profiles and trigger traces.
//!
//! Responsibilities:
//! - Parse TOML/JSON documents
//! - Validate them
//! - Produce `GateProfile` / `TriggerTrace`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let profile = ConfigLoader::load_from_path(Path::new("gates.toml")).unwrap();
//! println!("default window: {}ms", profile.default_quiet_window_ms);
//! ```

mod parser;
mod validator;

pub use contracts::{GateProfile, TriggerTrace};
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Profile loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a profile from a file path
    ///
    /// Format is detected from the extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<GateProfile, ContractError> {
        let format = detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, "loading gate profile");
        Self::load_from_str(&content, format)
    }

    /// Load a profile from a string
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<GateProfile, ContractError> {
        let profile = parser::parse_profile(content, format)?;
        validator::validate_profile(&profile)?;
        Ok(profile)
    }

    /// Serialize a profile to TOML
    pub fn to_toml(profile: &GateProfile) -> Result<String, ContractError> {
        toml::to_string_pretty(profile)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a profile to JSON
    pub fn to_json(profile: &GateProfile) -> Result<String, ContractError> {
        serde_json::to_string_pretty(profile)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

/// Trigger trace loader
pub struct TraceLoader;

impl TraceLoader {
    pub fn load_from_path(path: &Path) -> Result<TriggerTrace, ContractError> {
        let format = detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, "loading trigger trace");
        Self::load_from_str(&content, format)
    }

    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<TriggerTrace, ContractError> {
        let trace = parser::parse_trace(content, format)?;
        validator::validate_trace(&trace)?;
        Ok(trace)
    }
}

fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
    let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
        ContractError::config_parse("cannot determine file format from extension")
    })?;

    ConfigFormat::from_extension(ext)
        .ok_or_else(|| ContractError::config_parse(format!("unsupported config format: .{ext}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const PROFILE_TOML: &str = r#"
version = "v1"
default_quiet_window_ms = 800

[[sources]]
id = "submit"
quiet_window_ms = 2000

[[sources]]
id = "back"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let profile = ConfigLoader::load_from_str(PROFILE_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(profile.window_for("submit"), Some(Duration::from_millis(2000)));
        assert_eq!(profile.window_for("back"), Some(Duration::from_millis(800)));
    }

    #[test]
    fn test_round_trip_formats() {
        let profile = ConfigLoader::load_from_str(PROFILE_TOML, ConfigFormat::Toml).unwrap();

        let toml = ConfigLoader::to_toml(&profile).unwrap();
        let again = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(again.sources.len(), 2);

        let json = ConfigLoader::to_json(&profile).unwrap();
        let again = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(again.sources[0].quiet_window_ms, Some(2000));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[[sources]]
id = "dup"

[[sources]]
id = "dup"
"#;
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {err}");
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(PROFILE_TOML.as_bytes()).unwrap();
        let profile = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(profile.sources.len(), 2);
    }

    #[test]
    fn test_load_from_path_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"), "got: {err}");
    }

    #[test]
    fn test_trace_loader_checks_order() {
        let content = r#"{ "triggers": [
            { "source": "a", "at_ms": 50 },
            { "source": "a", "at_ms": 10 }
        ] }"#;
        let err = TraceLoader::load_from_str(content, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ContractError::TraceOrder { .. }));
    }
}
