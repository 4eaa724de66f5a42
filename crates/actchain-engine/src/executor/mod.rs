mod chain;
mod options;

pub use chain::{create_executor, ChainError, ChainExecutor, ChainRun};
pub use options::ExecutorOptions;
