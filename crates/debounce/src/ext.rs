//! Safe-listener extension for trigger sources.

use std::sync::Arc;
use std::time::Duration;

use contracts::{Clock, MonotonicClock, TriggerEvent, TriggerSource};
use tracing::debug;

use crate::metrics::GateMetrics;
use crate::{SharedGate, DEFAULT_QUIET_WINDOW};

/// Handle to the gate behind a safe listener
#[derive(Debug, Clone)]
pub struct SafeListener<C: Clock + 'static = MonotonicClock> {
    gate: Arc<SharedGate<SafeHandler, C>>,
}

type SafeHandler = Box<dyn Fn(Option<TriggerEvent>) + Send + Sync>;

impl<C: Clock + 'static> SafeListener<C> {
    pub fn quiet_window(&self) -> Duration {
        self.gate.quiet_window()
    }

    pub fn metrics(&self) -> &GateMetrics {
        self.gate.metrics()
    }
}

/// Registers a debounced listener on any [`TriggerSource`].
///
/// ```ignore
/// button.listen_safe_default(|event| {
///     if let Some(event) = event {
///         submit(event.sequence);
///     }
/// });
/// ```
pub trait SafeTriggerExt: TriggerSource {
    /// Listen with the default 800ms window.
    fn listen_safe_default<F>(&self, handler: F) -> SafeListener
    where
        F: Fn(Option<TriggerEvent>) + Send + Sync + 'static,
    {
        self.listen_safe(DEFAULT_QUIET_WINDOW, handler)
    }

    fn listen_safe<F>(&self, quiet_window: Duration, handler: F) -> SafeListener
    where
        F: Fn(Option<TriggerEvent>) + Send + Sync + 'static,
    {
        self.listen_safe_with_clock(quiet_window, MonotonicClock::new(), handler)
    }

    /// Listen through a gate reading `clock`. Replaces any previous listener,
    /// and with it the previous gate.
    fn listen_safe_with_clock<F, C>(
        &self,
        quiet_window: Duration,
        clock: C,
        handler: F,
    ) -> SafeListener<C>
    where
        F: Fn(Option<TriggerEvent>) + Send + Sync + 'static,
        C: Clock + 'static,
    {
        let handler: SafeHandler = Box::new(handler);
        let gate = Arc::new(SharedGate::with_clock(quiet_window, clock, handler));

        let listener_gate = gate.clone();
        self.listen(Arc::new(move |event: TriggerEvent| {
            listener_gate.on_trigger(Some(event));
        }));

        debug!(
            source_id = self.source_id(),
            quiet_window = ?quiet_window,
            "safe listener attached"
        );

        SafeListener { gate }
    }
}

impl<T: TriggerSource + ?Sized> SafeTriggerExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ManualClock, TriggerCallback};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Button {
        listener: Mutex<Option<TriggerCallback>>,
    }

    impl Button {
        fn press(&self, sequence: u64) {
            let listener = self.listener.lock().unwrap().clone();
            if let Some(listener) = listener {
                listener(TriggerEvent::tap("button", sequence));
            }
        }
    }

    impl TriggerSource for Button {
        fn source_id(&self) -> &str {
            "button"
        }

        fn listen(&self, callback: TriggerCallback) {
            *self.listener.lock().unwrap() = Some(callback);
        }

        fn stop(&self) {
            self.listener.lock().unwrap().take();
        }

        fn is_listening(&self) -> bool {
            self.listener.lock().unwrap().is_some()
        }
    }

    #[test]
    fn test_listen_safe_debounces_presses() {
        let button = Button::default();
        let clock = ManualClock::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let listener = button.listen_safe_with_clock(
            Duration::from_millis(800),
            clock.clone(),
            move |event: Option<TriggerEvent>| {
                sink.lock().unwrap().extend(event.map(|e| e.sequence));
            },
        );

        button.press(0);
        clock.advance(Duration::from_millis(300));
        button.press(1);
        clock.advance(Duration::from_millis(500));
        button.press(2);

        assert_eq!(*seen.lock().unwrap(), vec![0, 2]);
        assert_eq!(listener.metrics().suppressed(), 1);
    }

    #[test]
    fn test_listen_safe_default_window() {
        let button = Button::default();
        let listener = button.listen_safe_default(|_| {});
        assert!(button.is_listening());
        assert_eq!(listener.quiet_window(), DEFAULT_QUIET_WINDOW);

        button.stop();
        button.press(0);
        assert_eq!(listener.metrics().snapshot().total(), 0);
    }
}
