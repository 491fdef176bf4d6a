//! GateProfile - Config Loader output
//!
//! Declares which trigger sources exist and the quiet window each one uses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Process-wide default quiet window, in milliseconds
pub const DEFAULT_QUIET_WINDOW_MS: u64 = 800;

/// Window used by older safe-click listeners, in milliseconds
pub const LEGACY_QUIET_WINDOW_MS: u64 = 2000;

/// Upper bound accepted from configuration (ten minutes)
pub const MAX_QUIET_WINDOW_MS: u64 = 600_000;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Gate profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GateProfile {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Window applied to sources that don't set their own
    #[serde(default = "default_quiet_window_ms")]
    #[validate(range(max = 600000))]
    pub default_quiet_window_ms: u64,

    /// Known trigger sources
    #[serde(default)]
    #[validate(nested)]
    pub sources: Vec<SourceConfig>,
}

/// Per-source settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    #[validate(length(min = 1, max = 128))]
    pub id: String,

    /// Overrides the profile default when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 600000))]
    pub quiet_window_ms: Option<u64>,

    /// Disabled sources are known but refuse attachment
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_quiet_window_ms() -> u64 {
    DEFAULT_QUIET_WINDOW_MS
}

fn default_enabled() -> bool {
    true
}

impl Default for GateProfile {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            default_quiet_window_ms: DEFAULT_QUIET_WINDOW_MS,
            sources: Vec::new(),
        }
    }
}

impl GateProfile {
    pub fn default_quiet_window(&self) -> Duration {
        Duration::from_millis(self.default_quiet_window_ms)
    }

    /// Look up a source by id
    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Effective window for `id`, or `None` if the profile doesn't know it
    pub fn window_for(&self, id: &str) -> Option<Duration> {
        self.source(id)
            .map(|s| s.effective_window(self.default_quiet_window_ms))
    }

    /// `(id, window, enabled)` for every declared source, in declaration order
    pub fn resolved(&self) -> impl Iterator<Item = (&str, Duration, bool)> + '_ {
        self.sources.iter().map(move |s| {
            (
                s.id.as_str(),
                s.effective_window(self.default_quiet_window_ms),
                s.enabled,
            )
        })
    }
}

impl SourceConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quiet_window_ms: None,
            enabled: true,
        }
    }

    pub fn with_window_ms(mut self, ms: u64) -> Self {
        self.quiet_window_ms = Some(ms);
        self
    }

    pub fn effective_window(&self, default_ms: u64) -> Duration {
        Duration::from_millis(self.quiet_window_ms.unwrap_or(default_ms))
    }
}
