//! Replay report and its text / JSON renderings.

use std::collections::BTreeMap;

use contracts::{SourceId, TriggerKind};
use observability::MetricsSummary;
use serde::Serialize;

/// What happened to one recorded trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Fired,
    Suppressed,
    /// No gate for the source (disabled in the profile)
    Rejected,
}

impl StepOutcome {
    fn label(self) -> &'static str {
        match self {
            Self::Fired => "fired",
            Self::Suppressed => "suppressed",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub source: SourceId,
    pub at_ms: u64,
    pub kind: TriggerKind,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub summary: MetricsSummary,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    steps: &'a [ReplayStep],
    total_triggers: usize,
    fired: u64,
    suppressed: u64,
    rejected: usize,
    suppression_rate: f64,
    per_source: BTreeMap<&'a str, JsonSource>,
}

#[derive(Serialize)]
struct JsonSource {
    fired: u64,
    suppressed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_gap_ms: Option<f64>,
}

impl ReplayReport {
    pub fn new(steps: Vec<ReplayStep>, summary: MetricsSummary) -> Self {
        Self { steps, summary }
    }

    pub fn rejected(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Rejected)
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let per_source = self
            .summary
            .per_source
            .iter()
            .map(|(id, s)| {
                let source = JsonSource {
                    fired: s.fired,
                    suppressed: s.suppressed,
                    mean_gap_ms: (s.gap_ms.count > 0).then_some(s.gap_ms.mean),
                };
                (id.as_str(), source)
            })
            .collect();

        serde_json::to_string_pretty(&JsonReport {
            steps: &self.steps,
            total_triggers: self.steps.len(),
            fired: self.summary.total_fired,
            suppressed: self.summary.total_suppressed,
            rejected: self.rejected(),
            suppression_rate: self.summary.suppression_rate,
            per_source,
        })
    }

    pub fn print(&self) {
        for step in &self.steps {
            println!(
                "{:>5}  {:>8}ms  {:<20} {:?}  {}",
                step.index,
                step.at_ms,
                step.source,
                step.kind,
                step.outcome.label()
            );
        }
        println!();
        print!("{}", self.summary);
        let rejected = self.rejected();
        if rejected > 0 {
            println!("Rejected (disabled sources): {}", rejected);
        }
    }
}
