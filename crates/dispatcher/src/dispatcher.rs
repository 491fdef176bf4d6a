//! TriggerDispatcher - one debounce gate per attached source

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use contracts::{Clock, GateProfile, MonotonicClock, SourceId, TriggerEvent};
use debounce::{DebounceGate, GateSnapshot, DEFAULT_QUIET_WINDOW};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::DispatcherError;

/// Handler stored by the dispatcher
pub type TriggerHandler = Box<dyn FnMut(Option<&TriggerEvent>) + Send>;

type SharedClock = Arc<dyn Clock>;

struct SourceGate {
    gate: DebounceGate<TriggerHandler, SharedClock>,
    last_trigger: Option<Duration>,
}

/// Builder for [`TriggerDispatcher`]
pub struct DispatcherBuilder {
    default_window: Duration,
    clock: SharedClock,
    profile: Option<GateProfile>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            default_window: DEFAULT_QUIET_WINDOW,
            clock: Arc::new(MonotonicClock::new()),
            profile: None,
        }
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window for sources attached without an explicit one.
    /// Overridden by the profile default if a profile is set.
    pub fn default_window(mut self, window: Duration) -> Self {
        self.default_window = window;
        self
    }

    /// Clock shared by every gate the dispatcher creates
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn profile(mut self, profile: GateProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub fn build(self) -> TriggerDispatcher {
        let default_window = self
            .profile
            .as_ref()
            .map_or(self.default_window, GateProfile::default_quiet_window);

        debug!(
            default_window = ?default_window,
            profiled_sources = self.profile.as_ref().map_or(0, |p| p.sources.len()),
            "trigger dispatcher created"
        );

        TriggerDispatcher {
            clock: self.clock,
            default_window,
            profile: self.profile,
            gates: HashMap::new(),
        }
    }
}

/// Routes triggers to per-source gates.
///
/// Attaching a source creates a fresh gate; detaching (or re-attaching)
/// drops it. Gates never share state, so sources debounce independently.
pub struct TriggerDispatcher {
    clock: SharedClock,
    default_window: Duration,
    profile: Option<GateProfile>,
    gates: HashMap<SourceId, SourceGate>,
}

impl TriggerDispatcher {
    pub fn new(default_window: Duration) -> Self {
        DispatcherBuilder::new().default_window(default_window).build()
    }

    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatcher owning `profile`; its windows apply on attach.
    pub fn from_profile(profile: GateProfile) -> Self {
        DispatcherBuilder::new().profile(profile).build()
    }

    pub fn default_window(&self) -> Duration {
        self.default_window
    }

    /// Attach `handler` to `source_id`.
    ///
    /// `window` falls back to the profile's window for the source, then to
    /// the dispatcher default. An existing gate for the source is replaced.
    pub fn attach<F>(&mut self, source_id: impl Into<SourceId>, window: Option<Duration>, handler: F)
    where
        F: FnMut(Option<&TriggerEvent>) + Send + 'static,
    {
        let source_id = source_id.into();
        let window = window
            .or_else(|| self.profile.as_ref()?.window_for(&source_id))
            .unwrap_or(self.default_window);

        let handler: TriggerHandler = Box::new(handler);
        let gate = DebounceGate::with_clock(window, self.clock.clone(), handler);
        let replaced = self
            .gates
            .insert(
                source_id.clone(),
                SourceGate {
                    gate,
                    last_trigger: None,
                },
            )
            .is_some();

        debug!(
            source_id = %source_id,
            quiet_window = ?window,
            replaced,
            "gate attached"
        );
        observability::record_sources_attached(self.gates.len());
    }

    /// Attach using the profile's settings for `source_id`.
    ///
    /// # Errors
    /// - the source is not declared in the profile (or there is no profile)
    /// - the source is disabled
    pub fn attach_configured<F>(&mut self, source_id: &str, handler: F) -> Result<(), DispatcherError>
    where
        F: FnMut(Option<&TriggerEvent>) + Send + 'static,
    {
        let config = self
            .profile
            .as_ref()
            .and_then(|p| p.source(source_id))
            .ok_or_else(|| DispatcherError::NotInProfile {
                source_id: source_id.to_string(),
            })?;

        if !config.enabled {
            return Err(DispatcherError::SourceDisabled {
                source_id: source_id.to_string(),
            });
        }

        let window = config
            .quiet_window_ms
            .map(Duration::from_millis)
            .unwrap_or(self.default_window);
        self.attach(source_id, Some(window), handler);
        Ok(())
    }

    /// Drop the gate for `source_id`. Returns whether one was attached.
    pub fn detach(&mut self, source_id: &str) -> bool {
        let removed = self.gates.remove(source_id).is_some();
        if removed {
            debug!(source_id, "gate detached");
            observability::record_sources_attached(self.gates.len());
        }
        removed
    }

    pub fn is_attached(&self, source_id: &str) -> bool {
        self.gates.contains_key(source_id)
    }

    /// Attached source ids, sorted
    pub fn sources(&self) -> Vec<SourceId> {
        let mut ids: Vec<_> = self.gates.keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    /// Window of the attached gate for `source_id`
    pub fn window_for(&self, source_id: &str) -> Option<Duration> {
        self.gates.get(source_id).map(|s| s.gate.quiet_window())
    }

    /// Route an event to its source's gate.
    pub fn dispatch(&mut self, event: &TriggerEvent) -> Result<(), DispatcherError> {
        self.trigger(event.source_id.as_str(), Some(event))
    }

    /// Deliver a trigger for `source_id` with an optional payload.
    ///
    /// # Errors
    /// Returns [`DispatcherError::UnknownSource`] if no gate is attached.
    /// Suppression is not an error and is not reported.
    pub fn trigger(
        &mut self,
        source_id: &str,
        payload: Option<&TriggerEvent>,
    ) -> Result<(), DispatcherError> {
        let now = self.clock.now();
        let entry = self
            .gates
            .get_mut(source_id)
            .ok_or_else(|| DispatcherError::unknown_source(source_id))?;

        if let Some(prev) = entry.last_trigger {
            observability::record_trigger_gap(source_id, now.saturating_sub(prev));
        }
        entry.last_trigger = Some(now);

        let fired_before = entry.gate.metrics().fired();
        entry.gate.on_trigger(payload);
        let fired = entry.gate.metrics().fired() > fired_before;

        trace!(source_id, fired, "trigger routed");
        observability::record_trigger(source_id, fired);
        Ok(())
    }

    /// Counter snapshots for every attached source, sorted by id
    pub fn metrics(&self) -> Vec<(SourceId, GateSnapshot)> {
        let mut out: Vec<_> = self
            .gates
            .iter()
            .map(|(id, s)| (id.clone(), s.gate.metrics().snapshot()))
            .collect();
        out.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        out
    }

    /// Consume events from `input_rx` until the channel closes.
    ///
    /// Events for unknown sources are logged and skipped.
    #[instrument(name = "dispatcher_run", skip(self, input_rx))]
    pub async fn run(mut self, mut input_rx: mpsc::Receiver<TriggerEvent>) -> Self {
        info!(sources = self.gates.len(), "Dispatcher started");

        let mut event_count: u64 = 0;
        while let Some(event) = input_rx.recv().await {
            event_count += 1;
            if let Err(e) = self.dispatch(&event) {
                warn!(error = %e, sequence = event.sequence, "trigger dropped");
            }
        }

        info!(events = event_count, "Dispatcher input closed, shutting down");
        self
    }

    /// Spawn [`run`](Self::run) as a background task. The task returns the
    /// dispatcher so its metrics can be read after shutdown.
    pub fn spawn(self, input_rx: mpsc::Receiver<TriggerEvent>) -> JoinHandle<Self> {
        tokio::spawn(self.run(input_rx))
    }
}
