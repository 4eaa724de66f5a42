use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorOptions {
    /// Check the whole tree against the assembled invocation shapes before
    /// resolving anything. Per-node input validation runs either way.
    #[serde(default)]
    pub check_chain_shape: bool,
    /// Check each action's output against its declared output type.
    #[serde(default = "default_true")]
    pub validate_outputs: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            check_chain_shape: false,
            validate_outputs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
