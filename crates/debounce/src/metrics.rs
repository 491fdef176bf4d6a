//! Gate counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for a single gate
#[derive(Debug, Default)]
pub struct GateMetrics {
    /// Triggers that reached the handler
    fired: AtomicU64,
    /// Triggers dropped inside the quiet window
    suppressed: AtomicU64,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fired(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    pub fn inc_fired(&self) {
        self.fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub fn inc_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GateSnapshot {
        GateSnapshot {
            fired: self.fired(),
            suppressed: self.suppressed(),
        }
    }
}

/// Point-in-time copy of [`GateMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateSnapshot {
    pub fired: u64,
    pub suppressed: u64,
}

impl GateSnapshot {
    pub fn total(&self) -> u64 {
        self.fired + self.suppressed
    }
}
