//! Semantic checks
//!
//! Rules:
//! - field ranges and id lengths (derive-based)
//! - source ids unique
//! - trace triggers in non-decreasing time order

use std::collections::HashSet;

use contracts::{ContractError, GateProfile, TriggerTrace};
use ::validator::Validate;

/// Validate a profile. Returns the first error found.
pub fn validate_profile(profile: &GateProfile) -> Result<(), ContractError> {
    profile
        .validate()
        .map_err(|e| ContractError::config_validation("profile", e.to_string()))?;
    validate_source_ids(profile)?;
    Ok(())
}

fn validate_source_ids(profile: &GateProfile) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for source in &profile.sources {
        if !seen.insert(source.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("sources[id={}]", source.id),
                "duplicate source id",
            ));
        }
    }
    Ok(())
}

/// Validate a trace: timestamps must never go backwards.
pub fn validate_trace(trace: &TriggerTrace) -> Result<(), ContractError> {
    for (index, pair) in trace.triggers.windows(2).enumerate() {
        if pair[1].at_ms < pair[0].at_ms {
            return Err(ContractError::TraceOrder {
                index: index + 1,
                at_ms: pair[1].at_ms,
                previous_ms: pair[0].at_ms,
            });
        }
    }
    Ok(())
}
