//! Document parsing
//!
//! TOML (primary) and JSON. Profiles and traces share the same front end;
//! only the error variant differs.

use contracts::{ContractError, GateProfile, TriggerTrace};
use serde::de::DeserializeOwned;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn parse_document<T: DeserializeOwned>(
    content: &str,
    format: ConfigFormat,
) -> Result<T, (String, Box<dyn std::error::Error + Send + Sync>)> {
    match format {
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| (format!("TOML parse error: {e}"), e.into()))
        }
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| (format!("JSON parse error: {e}"), e.into())),
    }
}

/// Parse a gate profile
pub fn parse_profile(content: &str, format: ConfigFormat) -> Result<GateProfile, ContractError> {
    parse_document(content, format).map_err(|(message, source)| ContractError::ConfigParse {
        message,
        source: Some(source),
    })
}

/// Parse a trigger trace
pub fn parse_trace(content: &str, format: ConfigFormat) -> Result<TriggerTrace, ContractError> {
    parse_document(content, format).map_err(|(message, source)| ContractError::TraceParse {
        message,
        source: Some(source),
    })
}
