use super::{
    ensure_monotonic_sequence, ChainEvent, ChainEventLog, ChainEventRecord, ChainEventSequenceError,
    ChainEventType,
};
use actchain_core::FieldPath;

#[test]
fn log_assigns_monotonic_sequence_numbers() {
    let mut log = ChainEventLog::new("run-7");
    log.push(ChainEvent::new(ChainEventType::ChainAccepted));
    log.push(ChainEvent::new(ChainEventType::NodeResolving).at(&FieldPath::root().param("text")));

    let records = log.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].seq, 1);
    assert_eq!(records[1].run_id, "run-7");
    assert_eq!(records[1].event.path.as_deref(), Some("$.params.text"));
    assert!(ensure_monotonic_sequence(&records).is_ok());
}

#[test]
fn gaps_in_the_sequence_are_reported() {
    let records = vec![
        ChainEventRecord::new("r", 0, ChainEvent::new(ChainEventType::NodeResolving)),
        ChainEventRecord::new("r", 2, ChainEvent::new(ChainEventType::NodeExecuted)),
    ];
    assert_eq!(
        ensure_monotonic_sequence(&records),
        Err(ChainEventSequenceError::NonMonotonic {
            index: 1,
            expected: 1,
            actual: 2,
        })
    );
    assert_eq!(ensure_monotonic_sequence(&[]), Err(ChainEventSequenceError::Empty));
}
