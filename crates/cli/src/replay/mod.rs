//! Trace replay.
//!
//! Feeds a recorded trigger trace through a [`TriggerDispatcher`] driven by
//! a [`ManualClock`], so every fire/suppress decision depends only on the
//! recorded timestamps.

mod report;

pub use report::{ReplayReport, ReplayStep, StepOutcome};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{GateProfile, ManualClock, SourceId, TriggerTrace};
use dispatcher::{DispatcherError, TriggerDispatcher};
use observability::TriggerStatsAggregator;
use tracing::{debug, info, instrument, warn};

/// Replay settings
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Sleep between triggers as recorded
    pub realtime: bool,
    /// Playback speed multiplier for realtime mode
    pub speed: f64,
    /// Window for sources the profile doesn't declare. Falls back to the
    /// profile default. Declared sources are never affected.
    pub undeclared_window: Option<Duration>,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            speed: 1.0,
            undeclared_window: None,
        }
    }
}

/// Replays one trace against one profile.
pub struct Replay {
    profile: GateProfile,
    trace: TriggerTrace,
    options: ReplayOptions,
}

impl Replay {
    pub fn new(profile: GateProfile, trace: TriggerTrace, options: ReplayOptions) -> Self {
        Self {
            profile,
            trace,
            options,
        }
    }

    /// Run the replay to completion.
    ///
    /// Enabled profile sources are attached with their configured window,
    /// sources only seen in the trace get `undeclared_window` or else the
    /// profile default. Triggers
    /// for disabled sources are reported as rejected.
    #[instrument(name = "replay_run", skip(self), fields(triggers = self.trace.len()))]
    pub async fn run(self) -> ReplayReport {
        let clock = ManualClock::new();
        let mut dispatcher = TriggerDispatcher::builder()
            .clock(clock.clone())
            .profile(self.profile.clone())
            .build();

        // Set by whichever handler runs; cleared before every dispatch.
        let fired = Arc::new(AtomicBool::new(false));

        for source in self.profile.sources.iter().filter(|s| s.enabled) {
            let flag = fired.clone();
            if let Err(e) = dispatcher.attach_configured(&source.id, move |_| {
                flag.store(true, Ordering::SeqCst);
            }) {
                warn!(error = %e, "failed to attach profiled source");
            }
        }

        for trigger in &self.trace.triggers {
            let id = trigger.source.as_str();
            if self.profile.source(id).is_none() && !dispatcher.is_attached(id) {
                debug!(
                    source_id = id,
                    window = ?self.options.undeclared_window,
                    "source not in profile"
                );
                let flag = fired.clone();
                let window = self.options.undeclared_window;
                dispatcher.attach(trigger.source.clone(), window, move |_| {
                    flag.store(true, Ordering::SeqCst);
                });
            }
        }

        info!(
            sources = dispatcher.sources().len(),
            default_window = ?dispatcher.default_window(),
            "Replay started"
        );

        let mut stats = TriggerStatsAggregator::new();
        let mut sequences: HashMap<SourceId, u64> = HashMap::new();
        let mut steps = Vec::with_capacity(self.trace.len());
        let mut previous_at = Duration::ZERO;

        for (index, trigger) in self.trace.triggers.iter().enumerate() {
            let at = trigger.at();
            if self.options.realtime {
                let gap = at.saturating_sub(previous_at);
                if !gap.is_zero() {
                    tokio::time::sleep(scale(gap, self.options.speed)).await;
                }
            }
            previous_at = at;

            let sequence = sequences.entry(trigger.source.clone()).or_insert(0);
            let event = trigger.to_event(*sequence);
            *sequence += 1;

            clock.set(at);
            fired.store(false, Ordering::SeqCst);

            let outcome = match dispatcher.dispatch(&event) {
                Ok(()) if fired.load(Ordering::SeqCst) => StepOutcome::Fired,
                Ok(()) => StepOutcome::Suppressed,
                Err(e @ DispatcherError::UnknownSource { .. }) => {
                    debug!(error = %e, "trigger rejected");
                    StepOutcome::Rejected
                }
                Err(e) => {
                    warn!(error = %e, "unexpected dispatch error");
                    StepOutcome::Rejected
                }
            };

            if outcome != StepOutcome::Rejected {
                stats.update(trigger.source.as_str(), at, outcome == StepOutcome::Fired);
            }

            steps.push(ReplayStep {
                index,
                source: trigger.source.clone(),
                at_ms: trigger.at_ms,
                kind: trigger.kind,
                outcome,
            });
        }

        let report = ReplayReport::new(steps, stats.summary());
        info!(
            fired = report.summary.total_fired,
            suppressed = report.summary.total_suppressed,
            rejected = report.rejected(),
            "Replay finished"
        );
        report
    }
}

fn scale(gap: Duration, speed: f64) -> Duration {
    if speed > 0.0 && speed.is_finite() {
        gap.div_f64(speed)
    } else {
        gap
    }
}
