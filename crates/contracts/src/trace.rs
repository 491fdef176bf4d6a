//! TriggerTrace - recorded triggers for offline replay

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Position, SourceId, TriggerEvent, TriggerKind};

/// A recorded sequence of triggers, ordered by time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerTrace {
    #[serde(default)]
    pub triggers: Vec<RecordedTrigger>,
}

/// One recorded trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedTrigger {
    /// Source the trigger was delivered to
    pub source: SourceId,

    /// Milliseconds since the start of the recording
    pub at_ms: u64,

    #[serde(default)]
    pub kind: TriggerKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl RecordedTrigger {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }

    /// Build the event a live source would have produced
    pub fn to_event(&self, sequence: u64) -> TriggerEvent {
        let position = match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position { x, y }),
            _ => None,
        };
        TriggerEvent {
            source_id: self.source.clone(),
            sequence,
            kind: self.kind,
            position,
        }
    }
}

impl TriggerTrace {
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Time of the last trigger, zero for an empty trace
    pub fn duration(&self) -> Duration {
        self.triggers
            .last()
            .map(RecordedTrigger::at)
            .unwrap_or_default()
    }
}
