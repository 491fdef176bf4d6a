//! # Contracts
//!
//! Shared interface types for the tapgate crates: clocks, trigger events,
//! trigger sources, gate profiles and errors.
//! Every other crate depends on this one; it depends on none of them.
//!
//! ## Time Model
//! - All gate arithmetic uses `Duration` readings from a monotonic [`Clock`]
//! - Only differences between readings matter; the clock origin is arbitrary

mod clock;
mod error;
mod event;
mod profile;
mod source_id;
mod trace;
mod trigger_source;

pub use clock::{duration_to_millis, duration_to_nanos, Clock, ManualClock, MonotonicClock};
pub use error::*;
pub use event::*;
pub use profile::*;
pub use source_id::SourceId;
pub use trace::*;
pub use trigger_source::{TriggerCallback, TriggerSource};
