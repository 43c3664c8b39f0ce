use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::Serialize;
use utoipa::ToSchema;

/// Kinds of platform requests worth counting against the rate budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    MessageCreate,
    MessageEdit,
    MessageDelete,
}

/// Fire-and-forget event sink.
pub trait EventRecorder: Send + Sync {
    fn record_event(&self, kind: RequestKind, count: u64);
}

/// In-process counters, reported on the health endpoint.
#[derive(Debug, Default)]
pub struct RequestCounters {
    counts: DashMap<RequestKind, u64>,
}

impl RequestCounters {
    /// Counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for one kind.
    pub fn get(&self, kind: RequestKind) -> u64 {
        self.counts.get(&kind).map(|entry| *entry).unwrap_or(0)
    }

    /// Ordered copy of every counter.
    pub fn snapshot(&self) -> BTreeMap<RequestKind, u64> {
        self.counts
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }
}

impl EventRecorder for RequestCounters {
    fn record_event(&self, kind: RequestKind, count: u64) {
        *self.counts.entry(kind).or_insert(0) += count;
    }
}
