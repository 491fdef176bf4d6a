//! Trigger metrics
//!
//! Exported counters go through the `metrics` facade; the aggregator keeps
//! an in-memory copy for end-of-run summaries.

use std::collections::BTreeMap;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record the outcome of one trigger.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_trigger;
///
/// record_trigger("submit_button", fired);
/// ```
pub fn record_trigger(source_id: &str, fired: bool) {
    let name = if fired {
        "tapgate_triggers_fired_total"
    } else {
        "tapgate_triggers_suppressed_total"
    };
    counter!(name, "source_id" => source_id.to_string()).increment(1);
}

/// Record the number of sources with an attached gate
pub fn record_sources_attached(count: usize) {
    gauge!("tapgate_sources_attached").set(count as f64);
}

/// Record the gap between two consecutive triggers of one source
pub fn record_trigger_gap(source_id: &str, gap: Duration) {
    histogram!(
        "tapgate_trigger_gap_ms",
        "source_id" => source_id.to_string()
    )
    .record(gap.as_secs_f64() * 1000.0);
}

/// Per-source tallies
#[derive(Debug, Clone, Default)]
pub struct SourceTally {
    pub fired: u64,
    pub suppressed: u64,
    last_trigger: Option<Duration>,
    /// Gaps between consecutive triggers, milliseconds
    pub gap_stats: RunningStats,
}

impl SourceTally {
    pub fn total(&self) -> u64 {
        self.fired + self.suppressed
    }
}

/// In-memory trigger aggregator
#[derive(Debug, Clone, Default)]
pub struct TriggerStatsAggregator {
    sources: BTreeMap<String, SourceTally>,
}

impl TriggerStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one trigger delivered to `source_id` at `at`
    pub fn update(&mut self, source_id: &str, at: Duration, fired: bool) {
        let tally = self.sources.entry(source_id.to_string()).or_default();
        if fired {
            tally.fired += 1;
        } else {
            tally.suppressed += 1;
        }
        if let Some(prev) = tally.last_trigger {
            tally
                .gap_stats
                .push(at.saturating_sub(prev).as_secs_f64() * 1000.0);
        }
        tally.last_trigger = Some(at);
    }

    pub fn source(&self, source_id: &str) -> Option<&SourceTally> {
        self.sources.get(source_id)
    }

    pub fn summary(&self) -> MetricsSummary {
        let total_fired = self.sources.values().map(|t| t.fired).sum();
        let total_suppressed = self.sources.values().map(|t| t.suppressed).sum();
        let total = total_fired + total_suppressed;

        MetricsSummary {
            total_triggers: total,
            total_fired,
            total_suppressed,
            suppression_rate: if total > 0 {
                total_suppressed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            per_source: self
                .sources
                .iter()
                .map(|(id, t)| {
                    (
                        id.clone(),
                        SourceSummary {
                            fired: t.fired,
                            suppressed: t.suppressed,
                            gap_ms: StatsSummary::from(&t.gap_stats),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of one run
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_triggers: u64,
    pub total_fired: u64,
    pub total_suppressed: u64,
    /// Percentage of triggers suppressed
    pub suppression_rate: f64,
    pub per_source: BTreeMap<String, SourceSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceSummary {
    pub fired: u64,
    pub suppressed: u64,
    pub gap_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Trigger Summary ===")?;
        writeln!(f, "Total triggers: {}", self.total_triggers)?;
        writeln!(f, "Fired: {}", self.total_fired)?;
        writeln!(
            f,
            "Suppressed: {} ({:.2}%)",
            self.total_suppressed, self.suppression_rate
        )?;

        for (id, source) in &self.per_source {
            writeln!(
                f,
                "  {}: fired={} suppressed={} gap_ms: {}",
                id, source.fired, source.suppressed, source.gap_ms
            )?;
        }

        Ok(())
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
