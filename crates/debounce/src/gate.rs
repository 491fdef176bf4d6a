//! Single-threaded debounce gate.

use std::fmt;
use std::time::Duration;

use contracts::{Clock, MonotonicClock};
use tracing::trace;

use crate::metrics::GateMetrics;
use crate::window::{remaining_cooldown, should_fire};
use crate::DEFAULT_QUIET_WINDOW;

/// Wraps a handler so it runs at most once per quiet window.
///
/// Triggers inside the window are dropped, not queued. The gate is driven
/// from one thread through `&mut self`; see [`SharedGate`](crate::SharedGate)
/// for hosts that deliver input on several threads.
///
/// # Example
///
/// ```
/// use contracts::ManualClock;
/// use debounce::DebounceGate;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut hits = Vec::new();
/// let mut gate = DebounceGate::with_clock(
///     Duration::from_millis(800),
///     clock.clone(),
///     |tag: Option<&'static str>| hits.push(tag),
/// );
///
/// gate.on_trigger(Some("first"));
/// clock.advance(Duration::from_millis(100));
/// gate.on_trigger(Some("too soon"));
/// clock.advance(Duration::from_millis(700));
/// gate.on_trigger(None::<&'static str>);
/// drop(gate);
///
/// assert_eq!(hits, vec![Some("first"), None]);
/// ```
pub struct DebounceGate<H, C = MonotonicClock> {
    quiet_window: Duration,
    last_fire: Option<Duration>,
    handler: H,
    clock: C,
    metrics: GateMetrics,
}

impl<H> DebounceGate<H, MonotonicClock> {
    /// Gate with the default 800ms window.
    pub fn new(handler: H) -> Self {
        Self::with_window(DEFAULT_QUIET_WINDOW, handler)
    }

    /// Gate with a custom window. Zero disables suppression.
    pub fn with_window(quiet_window: Duration, handler: H) -> Self {
        Self::with_clock(quiet_window, MonotonicClock::new(), handler)
    }
}

impl<H, C: Clock> DebounceGate<H, C> {
    pub fn with_clock(quiet_window: Duration, clock: C, handler: H) -> Self {
        Self {
            quiet_window,
            last_fire: None,
            handler,
            clock,
            metrics: GateMetrics::new(),
        }
    }

    /// Deliver one raw trigger.
    ///
    /// Runs the handler synchronously with `payload` unless the gate is
    /// cooling. A panic in the handler unwinds through this call.
    pub fn on_trigger<P>(&mut self, payload: Option<P>)
    where
        H: FnMut(Option<P>),
    {
        if self.admit() {
            (self.handler)(payload);
        }
    }

    /// Like [`on_trigger`](Self::on_trigger) for fallible handlers.
    ///
    /// The handler's error is returned unchanged. A suppressed trigger
    /// returns `Ok(())`.
    pub fn try_on_trigger<P, E>(&mut self, payload: Option<P>) -> Result<(), E>
    where
        H: FnMut(Option<P>) -> Result<(), E>,
    {
        if self.admit() {
            (self.handler)(payload)
        } else {
            Ok(())
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Clock reading of the most recent fire
    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }

    /// Whether a trigger delivered now would be suppressed
    pub fn is_cooling(&self) -> bool {
        !should_fire(self.clock.now(), self.last_fire, self.quiet_window)
    }

    pub fn remaining_cooldown(&self) -> Duration {
        remaining_cooldown(self.clock.now(), self.last_fire, self.quiet_window)
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    fn admit(&mut self) -> bool {
        let now = self.clock.now();
        if !should_fire(now, self.last_fire, self.quiet_window) {
            self.metrics.inc_suppressed();
            trace!(now = ?now, last_fire = ?self.last_fire, "trigger suppressed");
            return false;
        }
        // max() keeps last_fire from moving backwards on a zero window
        self.last_fire = Some(self.last_fire.map_or(now, |last| last.max(now)));
        self.metrics.inc_fired();
        trace!(now = ?now, "trigger fired");
        true
    }
}

impl<H, C> fmt::Debug for DebounceGate<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceGate")
            .field("quiet_window", &self.quiet_window)
            .field("last_fire", &self.last_fire)
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ManualClock;
    use std::cell::RefCell;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Trigger at each absolute time and return the times that fired.
    fn fire_times(window: Duration, times: &[u64]) -> Vec<u64> {
        let clock = ManualClock::new();
        let fired = RefCell::new(Vec::new());
        let mut gate = DebounceGate::with_clock(window, clock.clone(), |at: Option<u64>| {
            fired.borrow_mut().extend(at);
        });
        for &t in times {
            clock.set(ms(t));
            gate.on_trigger(Some(t));
        }
        drop(gate);
        fired.into_inner()
    }

    #[test]
    fn test_rapid_repeat_fires_once() {
        assert_eq!(fire_times(ms(800), &[0, 799]), vec![0]);
    }

    #[test]
    fn test_boundary_fires() {
        assert_eq!(fire_times(ms(800), &[0, 800]), vec![0, 800]);
    }

    #[test]
    fn test_zero_window_fires_every_time() {
        assert_eq!(fire_times(Duration::ZERO, &[0, 0, 1, 1, 2]), vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_window_measured_from_last_fire() {
        assert_eq!(fire_times(ms(800), &[0, 100, 900, 1700]), vec![0, 900, 1700]);
        // 700 is suppressed and does not extend the window
        assert_eq!(fire_times(ms(800), &[0, 700, 800]), vec![0, 800]);
    }

    #[test]
    fn test_first_trigger_fires_with_any_window() {
        let clock = ManualClock::starting_at(ms(10));
        let mut count = 0;
        let mut gate = DebounceGate::with_clock(Duration::MAX, clock, |_: Option<()>| count += 1);
        gate.on_trigger(None::<()>);
        gate.on_trigger(None::<()>);
        drop(gate);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_payload_passthrough() {
        #[derive(Debug, PartialEq)]
        struct Event(u32);

        let clock = ManualClock::new();
        let seen = RefCell::new(Vec::new());
        let mut gate = DebounceGate::with_clock(Duration::ZERO, clock, |e: Option<&Event>| {
            seen.borrow_mut().push(e.map(|e| e.0));
        });
        let event = Event(42);
        gate.on_trigger(Some(&event));
        gate.on_trigger(None::<&Event>);
        drop(gate);
        assert_eq!(seen.into_inner(), vec![Some(42), None]);
    }

    #[test]
    fn test_handler_error_propagates_unchanged() {
        let clock = ManualClock::new();
        let mut gate = DebounceGate::with_clock(ms(800), clock.clone(), |n: Option<i32>| {
            match n {
                Some(n) if n < 0 => Err(format!("negative: {n}")),
                _ => Ok(()),
            }
        });

        assert_eq!(gate.try_on_trigger(Some(-1)), Err("negative: -1".to_string()));
        // still cooling after a failed fire
        assert_eq!(gate.try_on_trigger(Some(-2)), Ok(()));
        clock.advance(ms(800));
        assert_eq!(gate.try_on_trigger(Some(3)), Ok(()));
        assert_eq!(gate.metrics().snapshot().fired, 2);
    }

    #[test]
    #[should_panic(expected = "handler blew up")]
    fn test_handler_panic_propagates() {
        let mut gate = DebounceGate::with_clock(ms(1), ManualClock::new(), |_: Option<()>| {
            panic!("handler blew up")
        });
        gate.on_trigger(None::<()>);
    }

    #[test]
    fn test_state_inspection() {
        let clock = ManualClock::new();
        let mut gate = DebounceGate::with_clock(ms(800), clock.clone(), |_: Option<()>| {});
        assert!(!gate.is_cooling());
        assert_eq!(gate.last_fire(), None);

        clock.set(ms(50));
        gate.on_trigger(None::<()>);
        assert_eq!(gate.last_fire(), Some(ms(50)));
        assert!(gate.is_cooling());

        clock.set(ms(450));
        assert_eq!(gate.remaining_cooldown(), ms(400));

        clock.set(ms(850));
        assert!(!gate.is_cooling());
        assert_eq!(gate.last_fire(), Some(ms(50)));
    }

    #[test]
    fn test_metrics_count_both_paths() {
        let clock = ManualClock::new();
        let mut gate = DebounceGate::with_clock(ms(800), clock.clone(), |_: Option<()>| {});
        for t in [0, 10, 20, 900] {
            clock.set(ms(t));
            gate.on_trigger(None::<()>);
        }
        let snap = gate.metrics().snapshot();
        assert_eq!(snap.fired, 2);
        assert_eq!(snap.suppressed, 2);
        assert_eq!(snap.total(), 4);
    }

    #[test]
    fn test_default_window() {
        let gate = DebounceGate::new(|_: Option<()>| {});
        assert_eq!(gate.quiet_window(), ms(800));
    }
}
