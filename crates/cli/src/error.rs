//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Gate profile not found
    #[error("Profile not found: {path}")]
    ProfileNotFound { path: String },

    /// Trigger trace not found
    #[error("Trace not found: {path}")]
    TraceNotFound { path: String },

    /// Window flag above the accepted bound
    #[error("Quiet window {value_ms}ms exceeds the maximum of {max_ms}ms")]
    WindowOutOfRange { value_ms: u64, max_ms: u64 },

    /// Profile failed validation
    #[error("Profile validation failed: {path}")]
    InvalidProfile { path: String },
}

impl CliError {
    pub fn profile_not_found(path: &Path) -> Self {
        Self::ProfileNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn trace_not_found(path: &Path) -> Self {
        Self::TraceNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn invalid_profile(path: &Path) -> Self {
        Self::InvalidProfile {
            path: path.display().to_string(),
        }
    }
}
