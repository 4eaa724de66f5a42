mod jsonl;
mod types;

pub use jsonl::{encode_event_jsonl_line, parse_event_jsonl_line};
pub use types::{
    ensure_monotonic_sequence, ChainEvent, ChainEventLog, ChainEventRecord, ChainEventSequenceError,
    ChainEventType, CHAIN_EVENT_SCHEMA_0_0_1,
};
