use actchain_core::{FieldPath, StructuredIssue, TypeSchema};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fmt::{Debug, Formatter};

use crate::json_schema::type_schema_to_json_schema;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema compile failed: {reason}")]
pub struct SchemaCompileError {
    pub reason: String,
}

/// A JSON Schema document compiled once and reused for every validation.
pub struct CompiledSchema {
    source: Value,
    compiled: JSONSchema,
}

impl CompiledSchema {
    pub fn compile(source: Value) -> Result<Self, SchemaCompileError> {
        let compiled = JSONSchema::options()
            .compile(&source)
            .map_err(|error| SchemaCompileError {
                reason: error.to_string(),
            })?;
        Ok(Self { source, compiled })
    }

    pub fn for_type(schema: &TypeSchema) -> Result<Self, SchemaCompileError> {
        Self::compile(type_schema_to_json_schema(schema))
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    /// Validation failures as issues rooted at `at`, sorted stably.
    pub fn validate_at(&self, instance: &Value, at: &FieldPath) -> Vec<StructuredIssue> {
        let mut issues = Vec::new();
        if let Err(errors) = self.compiled.validate(instance) {
            for error in errors {
                let pointer = error.instance_path.to_string();
                issues.push(StructuredIssue::error(
                    "schema_error",
                    at.joined(&FieldPath::from_json_pointer(pointer.as_str())),
                    error.to_string(),
                    "json_schema.validation",
                ));
            }
        }
        StructuredIssue::sort_stable(&mut issues);
        issues
    }

    pub fn validate(&self, instance: &Value) -> Vec<StructuredIssue> {
        self.validate_at(instance, &FieldPath::root())
    }
}

impl Debug for CompiledSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
