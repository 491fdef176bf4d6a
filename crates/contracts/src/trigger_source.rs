//! TriggerSource trait - input source abstraction
//!
//! Whatever produces raw triggers (a widget, a key binding, a test double)
//! exposes a single listener slot, the same way a platform view exposes one
//! click listener.

use std::sync::Arc;

use crate::TriggerEvent;

/// Listener invoked once per raw trigger, on the delivering thread.
pub type TriggerCallback = Arc<dyn Fn(TriggerEvent) + Send + Sync>;

/// Trigger source trait
///
/// # Example
///
/// ```ignore
/// let button: Box<dyn TriggerSource> = make_button();
/// button.listen(Arc::new(|event| println!("pressed: {}", event.source_id)));
/// // ...
/// button.stop();
/// ```
pub trait TriggerSource: Send + Sync {
    /// Source ID
    fn source_id(&self) -> &str;

    /// Register the listener.
    ///
    /// A source holds at most one listener; registering again replaces the
    /// previous one.
    fn listen(&self, callback: TriggerCallback);

    /// Drop the listener. Triggers arriving afterwards go nowhere.
    fn stop(&self);

    /// Whether a listener is currently registered
    fn is_listening(&self) -> bool;
}
