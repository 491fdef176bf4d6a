//! Mock trigger source
//!
//! In-process stand-in for a real widget, for tests and demos.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use contracts::{SourceId, TriggerCallback, TriggerEvent, TriggerKind, TriggerSource};
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Mock trigger source.
///
/// `emit` delivers synchronously on the calling thread, like a UI toolkit
/// delivering a click on its main loop.
pub struct MockTriggerSource {
    source_id: SourceId,
    listener: Mutex<Option<TriggerCallback>>,
    next_sequence: AtomicU64,
}

impl MockTriggerSource {
    pub fn new(source_id: impl Into<SourceId>) -> Self {
        Self {
            source_id: source_id.into(),
            listener: Mutex::new(None),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Produce one trigger. Returns the event, whether or not anyone was
    /// listening.
    pub fn emit(&self, kind: TriggerKind, position: Option<(f32, f32)>) -> TriggerEvent {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let mut event = TriggerEvent::new(self.source_id.clone(), sequence, kind);
        if let Some((x, y)) = position {
            event = event.at(x, y);
        }

        // Clone out of the lock so a listener may call back into the source.
        let listener = self.lock().clone();
        if let Some(listener) = listener {
            listener(event.clone());
        } else {
            trace!(source_id = %self.source_id, sequence, "no listener");
        }
        event
    }

    pub fn tap(&self) -> TriggerEvent {
        self.emit(TriggerKind::Tap, None)
    }

    pub fn tap_at(&self, x: f32, y: f32) -> TriggerEvent {
        self.emit(TriggerKind::Tap, Some((x, y)))
    }

    /// Number of triggers produced so far
    pub fn emitted(&self) -> u64 {
        self.next_sequence.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TriggerCallback>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TriggerSource for MockTriggerSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: TriggerCallback) {
        *self.lock() = Some(callback);
    }

    fn stop(&self) {
        self.lock().take();
    }

    fn is_listening(&self) -> bool {
        self.lock().is_some()
    }
}

/// Listener that forwards every trigger into a channel.
///
/// Bridges a source delivering on an arbitrary thread to a
/// [`TriggerDispatcher::run`](crate::TriggerDispatcher::run) loop. Triggers
/// are dropped with a warning when the channel is full or closed.
pub fn forwarding_callback(tx: mpsc::Sender<TriggerEvent>) -> TriggerCallback {
    Arc::new(move |event: TriggerEvent| {
        if let Err(e) = tx.try_send(event) {
            warn!(error = %e, "trigger channel unavailable, trigger dropped");
        }
    })
}
