//! # Dispatcher
//!
//! Trigger routing.
//!
//! Responsibilities:
//! - Keep one debounce gate per attached source
//! - Route raw triggers to the right gate
//! - Report fired / suppressed counts to observability

pub mod dispatcher;
pub mod error;
pub mod mock;

pub use contracts::{SourceId, TriggerEvent, TriggerSource};
pub use debounce::GateSnapshot;
pub use dispatcher::{DispatcherBuilder, TriggerDispatcher, TriggerHandler};
pub use error::DispatcherError;
pub use mock::{forwarding_callback, MockTriggerSource};
