//! TriggerEvent - what an input source hands to its listener

use serde::{Deserialize, Serialize};

use crate::SourceId;

/// Kind of raw input that produced a trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    Tap,
    LongPress,
    Key,
}

/// Pointer position in source-local coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A single raw trigger.
///
/// Gates treat this as opaque and hand it to the handler untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    /// Source that produced the trigger
    pub source_id: SourceId,

    /// Per-source sequence number, starting at 0
    pub sequence: u64,

    #[serde(default)]
    pub kind: TriggerKind,

    /// Pointer position, absent for key triggers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl TriggerEvent {
    pub fn new(source_id: impl Into<SourceId>, sequence: u64, kind: TriggerKind) -> Self {
        Self {
            source_id: source_id.into(),
            sequence,
            kind,
            position: None,
        }
    }

    pub fn tap(source_id: impl Into<SourceId>, sequence: u64) -> Self {
        Self::new(source_id, sequence, TriggerKind::Tap)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}
