use actchain_core::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHAIN_EVENT_SCHEMA_0_0_1: &str = "actchain-event/0.0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainEventType {
    ChainAccepted,
    NodeResolving,
    NodeValidated,
    NodeExecuted,
    NodeFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainEvent {
    #[serde(rename = "type")]
    pub event_type: ChainEventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl ChainEvent {
    pub fn new(event_type: ChainEventType) -> Self {
        Self {
            event_type,
            action: None,
            path: None,
            data: Map::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn at(mut self, path: &FieldPath) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainEventRecord {
    pub schema: String,
    pub run_id: String,
    pub seq: u64,
    pub event: ChainEvent,
}

impl ChainEventRecord {
    pub fn new(run_id: impl Into<String>, seq: u64, event: ChainEvent) -> Self {
        Self {
            schema: CHAIN_EVENT_SCHEMA_0_0_1.to_string(),
            run_id: run_id.into(),
            seq,
            event,
        }
    }
}

/// Sequence-numbered records of one chain execution.
#[derive(Debug, Clone)]
pub struct ChainEventLog {
    run_id: String,
    next_seq: u64,
    records: Vec<ChainEventRecord>,
}

impl ChainEventLog {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            next_seq: 0,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, event: ChainEvent) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.records
            .push(ChainEventRecord::new(self.run_id.clone(), seq, event));
    }

    pub fn run_id(&self) -> &str {
        self.run_id.as_str()
    }

    pub fn records(&self) -> &[ChainEventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ChainEventRecord> {
        self.records
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainEventSequenceError {
    #[error("sequence is empty")]
    Empty,
    #[error("sequence must start at 0, got {actual}")]
    InvalidStart { actual: u64 },
    #[error("sequence is not monotonic at index {index}: expected {expected}, got {actual}")]
    NonMonotonic {
        index: usize,
        expected: u64,
        actual: u64,
    },
}

pub fn ensure_monotonic_sequence(records: &[ChainEventRecord]) -> Result<(), ChainEventSequenceError> {
    let Some(first) = records.first() else {
        return Err(ChainEventSequenceError::Empty);
    };
    if first.seq != 0 {
        return Err(ChainEventSequenceError::InvalidStart { actual: first.seq });
    }
    for index in 1..records.len() {
        let expected = records[index - 1].seq + 1;
        let actual = records[index].seq;
        if actual != expected {
            return Err(ChainEventSequenceError::NonMonotonic {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
