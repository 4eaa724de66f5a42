mod cli;
mod config;
mod io;
mod logging;
mod run;

pub use cli::{CheckCommand, Cli, Commands, ExportCommand, GroupsCommand, OutputFormat};
pub use config::{
    load_runner_config, validate_runner_config, ExportConfig, RunnerConfig, RunnerConfigError,
    RUNNER_CONFIG_SCHEMA_0_0_1,
};
pub use io::{declared_actions, load_action_manifest, ActionManifest, ACTION_MANIFEST_SCHEMA_0_0_1};
pub use logging::init_tracing;
pub use run::{execute_check, execute_export, execute_groups, RunnerError};
