//! Finite, reference-based JSON Schema describing every chain the registry accepts.
//!
//! Each action gets one definition keyed by its name and each output identity
//! one `ActionUnionThatOutputs_<identity>` union; recursion goes through
//! `$ref`. Keys come from names and identities only and every list is sorted,
//! so equivalent action sets export byte-identical documents.

use crate::registry::{ConfigurationError, OutputGroupIndex, RegisteredAction};
use actchain_core::{stable_hash_hex, stable_json_pretty, stable_json_string, FieldPath, StructuredIssue, TypeIdentity};
use actchain_schema::{type_schema_to_json_schema, CompiledSchema};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub const OUTPUT_UNION_PREFIX_ROOT: &str = "ActionUnion";
pub const OUTPUT_UNION_PREFIX: &str = "ActionUnionThatOutputs_";
pub const ALL_ACTIONS_DEFINITION: &str = "ActionUnionAll";

#[derive(Debug)]
pub struct InterchangeSchema {
    document: Value,
    hash: String,
    validator: CompiledSchema,
}

impl InterchangeSchema {
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// SHA-256 over the key-sorted document.
    pub fn hash(&self) -> &str {
        self.hash.as_str()
    }

    /// Validates a `{"execution": ...}` document in interchange form.
    pub fn validate(&self, instance: &Value) -> Vec<StructuredIssue> {
        self.validator
            .validate_at(instance, &FieldPath::root())
            .into_iter()
            .map(|mut issue| {
                issue.kind = "chain_shape".to_string();
                issue
            })
            .collect()
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            stable_json_pretty(&self.document)
        } else {
            stable_json_string(&self.document)
        }
    }
}

pub fn output_union_key(identity: &TypeIdentity) -> String {
    format!("{OUTPUT_UNION_PREFIX}{identity}")
}

fn definition_ref(key: &str) -> Value {
    json!({ "$ref": format!("#/definitions/{key}") })
}

pub(crate) fn export_interchange_schema(
    actions: &[RegisteredAction],
    groups: &OutputGroupIndex,
) -> Result<InterchangeSchema, ConfigurationError> {
    let document = build_document(actions, groups);
    let hash = stable_hash_hex(&document).map_err(|error| ConfigurationError::Interchange {
        reason: error.to_string(),
    })?;
    let validator = CompiledSchema::compile(document.clone()).map_err(|error| {
        ConfigurationError::Interchange {
            reason: error.to_string(),
        }
    })?;
    Ok(InterchangeSchema {
        document,
        hash,
        validator,
    })
}

fn build_document(actions: &[RegisteredAction], groups: &OutputGroupIndex) -> Value {
    let by_name = actions
        .iter()
        .map(|action| (action.name(), action))
        .collect::<BTreeMap<_, _>>();

    let mut definitions = BTreeMap::<String, Value>::new();
    for (name, action) in &by_name {
        definitions.insert(name.to_string(), action_definition(action, groups));
    }

    for (identity, handles) in groups.iter() {
        let mut members = handles
            .iter()
            .map(|handle| actions[handle.index()].name())
            .collect::<Vec<_>>();
        members.sort_unstable();
        definitions.insert(output_union_key(identity), any_of_refs(&members));
    }

    let every_action = by_name.keys().copied().collect::<Vec<_>>();
    definitions.insert(ALL_ACTIONS_DEFINITION.to_string(), any_of_refs(&every_action));

    json!({
        "type": "object",
        "properties": { "execution": definition_ref(ALL_ACTIONS_DEFINITION) },
        "required": ["execution"],
        "additionalProperties": false,
        "definitions": definitions.into_iter().collect::<Map<_, _>>(),
    })
}

fn action_definition(action: &RegisteredAction, groups: &OutputGroupIndex) -> Value {
    let params = action
        .declaration()
        .params
        .iter()
        .map(|param| (param.name.as_str(), &param.schema))
        .collect::<BTreeMap<_, _>>();

    let mut properties = Map::new();
    for (name, schema) in &params {
        let mut any_of = vec![type_schema_to_json_schema(schema)];
        if let Some(identity) = TypeIdentity::of(schema) {
            if !groups.producers(&identity).is_empty() {
                any_of.push(definition_ref(output_union_key(&identity).as_str()));
            }
        }
        properties.insert(name.to_string(), json!({ "anyOf": any_of }));
    }

    json!({
        "type": "object",
        "properties": {
            "action": { "const": action.name() },
            "params": {
                "type": "object",
                "properties": properties,
                "required": params.keys().collect::<Vec<_>>(),
                "additionalProperties": false,
            },
        },
        "required": ["action", "params"],
        "additionalProperties": false,
    })
}

fn any_of_refs(names: &[&str]) -> Value {
    json!({ "anyOf": names.iter().map(|name| definition_ref(name)).collect::<Vec<_>>() })
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
