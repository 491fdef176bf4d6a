//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// No gate attached for the source
    #[error("no gate attached for source '{source_id}'")]
    UnknownSource { source_id: String },

    /// The profile does not declare the source
    #[error("source '{source_id}' is not declared in the gate profile")]
    NotInProfile { source_id: String },

    /// The profile declares the source but disables it
    #[error("source '{source_id}' is disabled in the gate profile")]
    SourceDisabled { source_id: String },
}

impl DispatcherError {
    pub fn unknown_source(source_id: impl Into<String>) -> Self {
        Self::UnknownSource {
            source_id: source_id.into(),
        }
    }
}
