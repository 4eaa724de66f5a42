pub mod action;
pub mod assembler;
pub mod events;
pub mod executor;
pub mod export;
pub mod invocation;
pub mod registry;

#[cfg(test)]
mod test_fixtures;

pub use action::{ActionDeclaration, ActionDefinition, ActionExecutor, ActionInput, FnExecutor, ParamDeclaration};
pub use assembler::{AssembledSchemas, InvocationShape, ParamShape};
pub use events::{
    encode_event_jsonl_line, ensure_monotonic_sequence, parse_event_jsonl_line, ChainEvent,
    ChainEventLog, ChainEventRecord, ChainEventSequenceError, ChainEventType,
    CHAIN_EVENT_SCHEMA_0_0_1,
};
pub use executor::{create_executor, ChainError, ChainExecutor, ChainRun, ExecutorOptions};
pub use export::{
    output_union_key, InterchangeSchema, ALL_ACTIONS_DEFINITION, OUTPUT_UNION_PREFIX,
    OUTPUT_UNION_PREFIX_ROOT,
};
pub use invocation::{ActionInvocation, InvocationDecodeError, ParamValue};
pub use registry::{ActionHandle, ConfigurationError, OutputGroupIndex, RegisteredAction, Registry};
