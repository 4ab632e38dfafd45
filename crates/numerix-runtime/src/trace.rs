#![forbid(unsafe_code)]

//! Bounded FIFO ledger of structured operation traces.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::mode::RuntimeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceOutcome {
    Ok,
    Rejected,
}

/// One recorded operation. Serialized as a single JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTrace {
    pub operation_id: String,
    pub operation: String,
    pub shape: Vec<usize>,
    pub mode: RuntimeMode,
    pub outcome: TraceOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub timing_ns: u128,
}

impl OperationTrace {
    /// A trace with no id yet; [`TraceLedger::record`] assigns one.
    #[must_use]
    pub fn new(operation: impl Into<String>, shape: Vec<usize>, mode: RuntimeMode) -> Self {
        Self {
            operation_id: String::new(),
            operation: operation.into(),
            shape,
            mode,
            outcome: TraceOutcome::Ok,
            detail: None,
            timing_ns: 0,
        }
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: TraceOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_timing_ns(mut self, timing_ns: u128) -> Self {
        self.timing_ns = timing_ns;
        self
    }

    #[must_use]
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Caller-owned trace buffer.
///
/// Capacity is `capacity.max(1)`. When full, the oldest entry is evicted
/// before a new one is appended. Operation ids come from a per-ledger
/// sequence, so two ledgers never share state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLedger {
    capacity: usize,
    next_sequence: u64,
    entries: VecDeque<OperationTrace>,
}

impl TraceLedger {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_sequence: 1,
            entries: VecDeque::new(),
        }
    }

    /// Append a trace, stamping its operation id. Returns the id.
    pub fn record(&mut self, mut trace: OperationTrace) -> String {
        trace.operation_id = format!("op-{:016x}", self.next_sequence);
        self.next_sequence += 1;
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
        }
        let id = trace.operation_id.clone();
        self.entries.push_back(trace);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn latest(&self) -> Option<&OperationTrace> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationTrace> {
        self.entries.iter()
    }

    /// Remove and return every buffered trace, oldest first.
    pub fn drain(&mut self) -> Vec<OperationTrace> {
        self.entries.drain(..).collect()
    }

    /// One JSON object per line, oldest first.
    #[must_use]
    pub fn serialize_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|entry| serde_json::to_string(entry).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
