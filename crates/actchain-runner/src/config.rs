use crate::io::decode_by_extension;
use actchain_core::{FieldPath, FieldPathSegment, IssueSeverity, StructuredIssue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const RUNNER_CONFIG_SCHEMA_0_0_1: &str = "actchain-runner/0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_runner_schema")]
    pub schema: String,
    /// Manifest used when no `--manifest` is given; relative to the config file.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            schema: default_runner_schema(),
            manifest: None,
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerConfigError {
    #[error("read runner config failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("runner config parse failed: {0}")]
    Parse(String),
    #[error("runner config validation failed: {}", StructuredIssue::summarize(.0))]
    Validation(Vec<StructuredIssue>),
}

pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, RunnerConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| RunnerConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let expanded = expand_env_placeholders(raw.as_str()).map_err(RunnerConfigError::Parse)?;
    let mut config: RunnerConfig =
        decode_by_extension(path, expanded.as_str()).map_err(RunnerConfigError::Parse)?;

    let mut issues = validate_runner_config(&config);
    StructuredIssue::sort_stable(&mut issues);
    if !issues.is_empty() {
        return Err(RunnerConfigError::Validation(issues));
    }

    if let (Some(manifest), Some(base)) = (config.manifest.as_ref(), path.parent()) {
        if manifest.is_relative() {
            config.manifest = Some(base.join(manifest));
        }
    }
    tracing::debug!(path = %path.display(), "runner config loaded");
    Ok(config)
}

pub fn validate_runner_config(config: &RunnerConfig) -> Vec<StructuredIssue> {
    let mut issues = Vec::<StructuredIssue>::new();
    if config.schema != RUNNER_CONFIG_SCHEMA_0_0_1 {
        issues.push(config_issue(
            "runner.config.schema",
            vec![FieldPathSegment::Key("schema".to_string())],
            format!(
                "unsupported runner config schema `{}` (expected `{}`)",
                config.schema, RUNNER_CONFIG_SCHEMA_0_0_1
            ),
        ));
    }
    if config
        .manifest
        .as_ref()
        .is_some_and(|manifest| manifest.as_os_str().is_empty())
    {
        issues.push(config_issue(
            "runner.config.manifest.non_empty",
            vec![FieldPathSegment::Key("manifest".to_string())],
            "manifest path must not be empty".to_string(),
        ));
    }
    issues
}

fn config_issue(reference: &str, path: Vec<FieldPathSegment>, message: String) -> StructuredIssue {
    StructuredIssue {
        kind: "runner_config_error".to_string(),
        severity: IssueSeverity::Error,
        action: None,
        field_path: FieldPath::from_segments(path),
        message,
        reference: Some(reference.to_string()),
        related: None,
    }
}

fn default_runner_schema() -> String {
    RUNNER_CONFIG_SCHEMA_0_0_1.to_string()
}

fn default_pretty() -> bool {
    true
}

pub(crate) fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    while let Some(start_offset) = input[cursor..].find("${") {
        let start = cursor + start_offset;
        out.push_str(&input[cursor..start]);
        let var_start = start + 2;
        let Some(end_offset) = input[var_start..].find('}') else {
            return Err("unterminated env placeholder `${...`".to_string());
        };
        let end = var_start + end_offset;
        let key = &input[var_start..end];
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        let value = std::env::var(key)
            .map_err(|_| format!("missing env var for placeholder `${{{key}}}`"))?;
        out.push_str(value.as_str());
        cursor = end + 1;
    }
    out.push_str(&input[cursor..]);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
