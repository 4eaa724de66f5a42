use crate::cli::{CheckCommand, ExportCommand, GroupsCommand, OutputFormat};
use crate::config::{load_runner_config, RunnerConfig};
use crate::io::{decode_by_extension, declared_actions, load_action_manifest};
use actchain_core::StructuredIssue;
use actchain_engine::{
    output_union_key, ActionInvocation, ConfigurationError, InvocationDecodeError, Registry,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("read file failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("write file failed `{path}`: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest path is required: pass `--manifest <file>` or set `manifest` in the runner config")]
    MissingManifest,
    #[error("runner config load failed: {0}")]
    ConfigLoad(String),
    #[error("manifest load failed: {}", StructuredIssue::summarize(.0))]
    ManifestLoad(Vec<StructuredIssue>),
    #[error("action registry rejected the manifest: {0}")]
    Registry(#[from] ConfigurationError),
    #[error("invocation parse failed: {0}")]
    InvocationParse(String),
    #[error(transparent)]
    MalformedInvocation(#[from] InvocationDecodeError),
    #[error("invocation rejected: {}", StructuredIssue::summarize(.0))]
    ChainShape(Vec<StructuredIssue>),
    #[error("json encode failed: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

/// Registry built from a manifest plus the config it was resolved with.
struct LoadedRegistry {
    config: RunnerConfig,
    manifest: PathBuf,
    registry: Registry,
}

fn load_registry(manifest: Option<&Path>, config: Option<&Path>) -> Result<LoadedRegistry, RunnerError> {
    let config = match config {
        Some(path) => {
            load_runner_config(path).map_err(|error| RunnerError::ConfigLoad(error.to_string()))?
        }
        None => RunnerConfig::default(),
    };
    let manifest = manifest
        .map(Path::to_path_buf)
        .or_else(|| config.manifest.clone())
        .ok_or(RunnerError::MissingManifest)?;
    let loaded = load_action_manifest(manifest.as_path()).map_err(RunnerError::ManifestLoad)?;
    let registry = Registry::new(declared_actions(&loaded))?;
    Ok(LoadedRegistry {
        config,
        manifest,
        registry,
    })
}

pub fn execute_export(command: &ExportCommand) -> Result<String, RunnerError> {
    let loaded = load_registry(command.manifest.as_deref(), command.config.as_deref())?;
    let interchange = loaded.registry.interchange();
    let document = interchange.to_json_string(loaded.config.export.pretty)?;

    if let Some(out) = &command.out {
        fs::write(out, format!("{document}\n")).map_err(|source| RunnerError::WriteFile {
            path: out.display().to_string(),
            source,
        })?;
        tracing::info!(out = %out.display(), hash = interchange.hash(), "interchange schema written");
    }

    let output = match (command.format.clone(), command.out.as_ref()) {
        (OutputFormat::Text, None) => document,
        (OutputFormat::Text, Some(out)) => format!(
            "actchain export\nmanifest: {}\nout: {}\nactions: {}\noutput_groups: {}\nhash: {}",
            loaded.manifest.display(),
            out.display(),
            loaded.registry.len(),
            loaded.registry.groups().len(),
            interchange.hash()
        ),
        (OutputFormat::Json, out) => {
            let mut report = json!({
                "schema": "actchain-export/0.0.1",
                "manifest": loaded.manifest.display().to_string(),
                "actions": loaded.registry.len(),
                "output_groups": loaded.registry.groups().len(),
                "hash": interchange.hash(),
            });
            match out {
                Some(out) => report["out"] = Value::String(out.display().to_string()),
                None => report["document"] = interchange.document().clone(),
            }
            serde_json::to_string_pretty(&report)?
        }
    };
    Ok(output)
}

pub fn execute_groups(command: &GroupsCommand) -> Result<String, RunnerError> {
    let loaded = load_registry(command.manifest.as_deref(), command.config.as_deref())?;
    let registry = &loaded.registry;

    let groups = registry
        .groups()
        .iter()
        .map(|(identity, handles)| {
            let mut actions = handles
                .iter()
                .map(|handle| registry.action(*handle).name())
                .collect::<Vec<_>>();
            actions.sort_unstable();
            (identity, actions)
        })
        .collect::<Vec<_>>();
    let ungrouped = registry
        .actions()
        .filter(|(_, action)| action.output_identity().is_none())
        .map(|(_, action)| action.name())
        .collect::<Vec<_>>();

    let output = match command.format {
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "actchain groups\nmanifest: {}\nactions: {}\noutput_groups: {}",
                loaded.manifest.display(),
                registry.len(),
                groups.len()
            )];
            for (identity, actions) in &groups {
                lines.push(format!("{identity}: {}", actions.join(", ")));
            }
            if !ungrouped.is_empty() {
                lines.push(format!("ungrouped: {}", ungrouped.join(", ")));
            }
            for issue in registry.diagnostics() {
                lines.push(format!("warning {}: {}", issue.field_path, issue.message));
            }
            lines.join("\n")
        }
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": "actchain-groups/0.0.1",
            "manifest": loaded.manifest.display().to_string(),
            "groups": groups
                .iter()
                .map(|(identity, actions)| json!({
                    "identity": identity,
                    "definition": output_union_key(identity),
                    "actions": actions,
                }))
                .collect::<Vec<_>>(),
            "ungrouped": ungrouped,
            "warnings": registry.diagnostics(),
        }))?,
    };
    Ok(output)
}

pub fn execute_check(command: &CheckCommand) -> Result<String, RunnerError> {
    let loaded = load_registry(command.manifest.as_deref(), command.config.as_deref())?;
    let registry = &loaded.registry;

    let text = fs::read_to_string(&command.invocation).map_err(|source| RunnerError::ReadFile {
        path: command.invocation.display().to_string(),
        source,
    })?;
    let document: Value =
        decode_by_extension(command.invocation.as_path(), text.as_str()).map_err(RunnerError::InvocationParse)?;

    let invocation = if command.interchange {
        let issues = registry.interchange().validate(&document);
        if !issues.is_empty() {
            return Err(RunnerError::ChainShape(issues));
        }
        let execution = document.get("execution").ok_or_else(|| {
            RunnerError::InvocationParse("interchange document must carry `execution`".to_string())
        })?;
        registry.decode_interchange(execution)?
    } else {
        serde_json::from_value::<ActionInvocation>(document)
            .map_err(|error| RunnerError::InvocationParse(error.to_string()))?
    };

    let issues = registry.check_invocation(&invocation);
    if !issues.is_empty() {
        return Err(RunnerError::ChainShape(issues));
    }
    tracing::debug!(action = invocation.action.as_str(), nodes = invocation.node_count(), "invocation accepted");

    let output = match command.format {
        OutputFormat::Text => format!(
            "actchain check\ninvocation: {}\naccepted: true\nroot: {}\nnodes: {}",
            command.invocation.display(),
            invocation.action,
            invocation.node_count()
        ),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "schema": "actchain-check/0.0.1",
            "invocation": command.invocation.display().to_string(),
            "accepted": true,
            "root": invocation.action,
            "nodes": invocation.node_count(),
        }))?,
    };
    Ok(output)
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
