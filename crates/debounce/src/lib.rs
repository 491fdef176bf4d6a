//! # Debounce
//!
//! Quiet-window gates for trigger handlers.
//!
//! Responsibilities:
//! - Run a handler at most once per quiet window
//! - Drop (never queue) triggers that arrive while cooling
//! - Forward the trigger payload to the handler untouched
//!
//! ## Usage
//!
//! ```ignore
//! use debounce::DebounceGate;
//!
//! let mut gate = DebounceGate::new(|event: Option<&TriggerEvent>| submit(event));
//!
//! // call once per raw trigger
//! gate.on_trigger(Some(&event));
//! ```

mod ext;
mod gate;
mod metrics;
mod shared;
mod window;

use std::time::Duration;

use contracts::{DEFAULT_QUIET_WINDOW_MS, LEGACY_QUIET_WINDOW_MS};

pub use ext::{SafeListener, SafeTriggerExt};
pub use gate::DebounceGate;
pub use metrics::{GateMetrics, GateSnapshot};
pub use shared::SharedGate;
pub use window::{remaining_cooldown, should_fire};

/// Default quiet window (800ms)
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(DEFAULT_QUIET_WINDOW_MS);

/// Quiet window of the older safe-click listener variant (2000ms)
pub const LEGACY_QUIET_WINDOW: Duration = Duration::from_millis(LEGACY_QUIET_WINDOW_MS);

// Re-export contracts types
pub use contracts::{Clock, ManualClock, MonotonicClock};
