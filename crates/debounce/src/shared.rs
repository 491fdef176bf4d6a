//! Debounce gate for hosts that deliver triggers on more than one thread.
//!
//! The last-fire reading lives in one `AtomicU64` and is advanced by
//! compare-and-swap, so two threads racing inside the same window cannot
//! both fire, and a thread holding an older reading cannot rewind it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use contracts::{duration_to_nanos, Clock, MonotonicClock};
use tracing::trace;

use crate::metrics::GateMetrics;
use crate::window::{remaining_cooldown, should_fire};
use crate::DEFAULT_QUIET_WINDOW;

/// Encoded "never fired"; readings are stored as `nanos + 1`.
const NEVER: u64 = 0;

fn encode(d: Duration) -> u64 {
    duration_to_nanos(d).saturating_add(1)
}

fn decode(raw: u64) -> Option<Duration> {
    match raw {
        NEVER => None,
        n => Some(Duration::from_nanos(n - 1)),
    }
}

/// Thread-safe counterpart of [`DebounceGate`](crate::DebounceGate).
pub struct SharedGate<H, C = MonotonicClock> {
    quiet_window: Duration,
    last_fire: AtomicU64,
    handler: H,
    clock: C,
    metrics: GateMetrics,
}

impl<H> SharedGate<H, MonotonicClock> {
    pub fn new(handler: H) -> Self {
        Self::with_window(DEFAULT_QUIET_WINDOW, handler)
    }

    pub fn with_window(quiet_window: Duration, handler: H) -> Self {
        Self::with_clock(quiet_window, MonotonicClock::new(), handler)
    }
}

impl<H, C: Clock> SharedGate<H, C> {
    pub fn with_clock(quiet_window: Duration, clock: C, handler: H) -> Self {
        Self {
            quiet_window,
            last_fire: AtomicU64::new(NEVER),
            handler,
            clock,
            metrics: GateMetrics::new(),
        }
    }

    /// Deliver one raw trigger from any thread.
    ///
    /// The handler runs on the calling thread. Nothing serializes handler
    /// invocations beyond the window itself: with a zero window, concurrent
    /// triggers may run the handler concurrently.
    pub fn on_trigger<P>(&self, payload: Option<P>)
    where
        H: Fn(Option<P>),
    {
        if self.admit() {
            (self.handler)(payload);
        }
    }

    /// Fallible variant; the handler's error is returned unchanged.
    pub fn try_on_trigger<P, E>(&self, payload: Option<P>) -> Result<(), E>
    where
        H: Fn(Option<P>) -> Result<(), E>,
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

    pub fn last_fire(&self) -> Option<Duration> {
        decode(self.last_fire.load(Ordering::Acquire))
    }

    pub fn is_cooling(&self) -> bool {
        !should_fire(self.clock.now(), self.last_fire(), self.quiet_window)
    }

    pub fn remaining_cooldown(&self) -> Duration {
        remaining_cooldown(self.clock.now(), self.last_fire(), self.quiet_window)
    }

    pub fn metrics(&self) -> &GateMetrics {
        &self.metrics
    }

    fn admit(&self) -> bool {
        let now = self.clock.now();
        let proposed = encode(now);
        let mut current = self.last_fire.load(Ordering::Acquire);

        loop {
            if !should_fire(now, decode(current), self.quiet_window) {
                self.metrics.inc_suppressed();
                trace!(now = ?now, "trigger suppressed");
                return false;
            }

            match self.last_fire.compare_exchange_weak(
                current,
                current.max(proposed),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.metrics.inc_fired();
                    trace!(now = ?now, "trigger fired");
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }
}

impl<H, C> fmt::Debug for SharedGate<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGate")
            .field("quiet_window", &self.quiet_window)
            .field("last_fire", &decode(self.last_fire.load(Ordering::Relaxed)))
            .field("metrics", &self.metrics.snapshot())
            .finish_non_exhaustive()
    }
}
