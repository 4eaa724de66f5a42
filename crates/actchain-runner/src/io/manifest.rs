use super::decode_by_extension;
use actchain_core::{FieldPath, IssueSeverity, StructuredIssue};
use actchain_engine::{ActionDeclaration, ActionDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub const ACTION_MANIFEST_SCHEMA_0_0_1: &str = "actchain-manifest/0.0.1";

/// Declared actions without executors, as read from a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionManifest {
    pub schema: String,
    pub actions: Vec<ActionDeclaration>,
}

pub fn load_action_manifest(path: &Path) -> Result<ActionManifest, Vec<StructuredIssue>> {
    let text = fs::read_to_string(path).map_err(|error| {
        vec![manifest_issue(
            FieldPath::root(),
            format!("read file failed: {error}"),
            "runner.manifest.read_failed",
            path,
        )]
    })?;
    let manifest: ActionManifest = decode_by_extension(path, text.as_str()).map_err(|reason| {
        vec![manifest_issue(
            FieldPath::root(),
            reason,
            "runner.manifest.parse_failed",
            path,
        )]
    })?;

    let mut issues = Vec::new();
    if manifest.schema != ACTION_MANIFEST_SCHEMA_0_0_1 {
        issues.push(manifest_issue(
            FieldPath::root().child_key("schema"),
            format!(
                "unsupported manifest schema `{}` (expected `{}`)",
                manifest.schema, ACTION_MANIFEST_SCHEMA_0_0_1
            ),
            "runner.manifest.schema",
            path,
        ));
    }
    if manifest.actions.is_empty() {
        issues.push(manifest_issue(
            FieldPath::root().child_key("actions"),
            "manifest must declare at least one action".to_string(),
            "runner.manifest.actions.non_empty",
            path,
        ));
    }
    if !issues.is_empty() {
        StructuredIssue::sort_stable(&mut issues);
        return Err(issues);
    }

    tracing::debug!(path = %path.display(), actions = manifest.actions.len(), "action manifest loaded");
    Ok(manifest)
}

/// Registers every declaration with an executor that refuses to run; enough
/// for grouping, exporting and shape checks.
pub fn declared_actions(manifest: &ActionManifest) -> Vec<ActionDefinition> {
    manifest
        .actions
        .iter()
        .cloned()
        .map(|declaration| {
            let name = declaration.name.clone();
            ActionDefinition::from_fn(declaration, move |_| {
                Err(format!("`{name}` is declared in a manifest and has no executor"))
            })
        })
        .collect()
}

fn manifest_issue(field_path: FieldPath, message: String, reference: &str, path: &Path) -> StructuredIssue {
    StructuredIssue {
        kind: "manifest_error".to_string(),
        severity: IssueSeverity::Error,
        action: None,
        field_path,
        message,
        reference: Some(reference.to_string()),
        related: Some(json!({ "file": Value::String(path.display().to_string()) })),
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
