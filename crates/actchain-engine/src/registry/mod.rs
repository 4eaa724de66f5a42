mod grouping;

use crate::action::{ActionDeclaration, ActionDefinition, ActionExecutor};
use crate::assembler::AssembledSchemas;
use crate::export::{export_interchange_schema, InterchangeSchema, OUTPUT_UNION_PREFIX_ROOT};
use crate::invocation::{ActionInvocation, InvocationDecodeError};
use actchain_core::{FieldPath, StructuredIssue, TypeIdentity, TypeSchemaError};
use actchain_schema::{CompiledSchema, SchemaCompileError};
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub use grouping::OutputGroupIndex;

const ACTION_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.-]*$";

/// Position of an action in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionHandle(usize);

impl ActionHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("registry requires at least one action")]
    Empty,
    #[error("invalid action name `{name}`: {reason}")]
    InvalidActionName { name: String, reason: String },
    #[error("duplicate action `{name}`")]
    DuplicateAction { name: String },
    #[error("action `{action}` has an empty parameter name")]
    EmptyParamName { action: String },
    #[error("action `{action}` declares parameter `{param}` more than once")]
    DuplicateParam { action: String, param: String },
    #[error("action `{action}` has a malformed {location} type: {source}")]
    MalformedType {
        action: String,
        location: String,
        #[source]
        source: TypeSchemaError,
    },
    #[error("action `{action}`: {source}")]
    SchemaCompile {
        action: String,
        #[source]
        source: SchemaCompileError,
    },
    #[error("interchange schema build failed: {reason}")]
    Interchange { reason: String },
}

pub struct RegisteredAction {
    declaration: ActionDeclaration,
    executor: Arc<dyn ActionExecutor>,
    output_identity: Option<TypeIdentity>,
    input_validator: CompiledSchema,
    output_validator: CompiledSchema,
}

impl RegisteredAction {
    pub fn name(&self) -> &str {
        self.declaration.name.as_str()
    }

    pub fn declaration(&self) -> &ActionDeclaration {
        &self.declaration
    }

    pub fn executor(&self) -> &dyn ActionExecutor {
        self.executor.as_ref()
    }

    pub fn output_identity(&self) -> Option<&TypeIdentity> {
        self.output_identity.as_ref()
    }

    pub fn input_validator(&self) -> &CompiledSchema {
        &self.input_validator
    }

    pub fn output_validator(&self) -> &CompiledSchema {
        &self.output_validator
    }
}

impl Debug for RegisteredAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAction")
            .field("declaration", &self.declaration)
            .field("output_identity", &self.output_identity)
            .finish_non_exhaustive()
    }
}

/// Immutable action set with every derived index built up front.
pub struct Registry {
    actions: Vec<RegisteredAction>,
    by_name: HashMap<String, ActionHandle>,
    groups: OutputGroupIndex,
    shapes: AssembledSchemas,
    interchange: InterchangeSchema,
    diagnostics: Vec<StructuredIssue>,
}

impl Registry {
    pub fn new(definitions: Vec<ActionDefinition>) -> Result<Self, ConfigurationError> {
        if definitions.is_empty() {
            return Err(ConfigurationError::Empty);
        }

        let name_pattern = Regex::new(ACTION_NAME_PATTERN).expect("valid regex");
        let mut actions = Vec::with_capacity(definitions.len());
        let mut by_name = HashMap::new();
        for (index, definition) in definitions.into_iter().enumerate() {
            let registered = register_action(definition, &name_pattern)?;
            let name = registered.name().to_string();
            if by_name.insert(name.clone(), ActionHandle::new(index)).is_some() {
                return Err(ConfigurationError::DuplicateAction { name });
            }
            actions.push(registered);
        }

        let groups = OutputGroupIndex::build(actions.iter().map(RegisteredAction::output_identity));
        let shapes = AssembledSchemas::assemble(&actions, &groups)?;
        let interchange = export_interchange_schema(&actions, &groups)?;
        let diagnostics = collect_diagnostics(&actions, &groups);

        for issue in &diagnostics {
            tracing::warn!(
                action = issue.action.as_deref().unwrap_or("-"),
                path = %issue.field_path,
                "{}",
                issue.message
            );
        }
        tracing::info!(
            actions = actions.len(),
            output_groups = groups.len(),
            interchange_hash = interchange.hash(),
            "action registry built"
        );

        Ok(Self {
            actions,
            by_name,
            groups,
            shapes,
            interchange,
            diagnostics,
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn handle(&self, name: &str) -> Option<ActionHandle> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn action(&self, handle: ActionHandle) -> &RegisteredAction {
        &self.actions[handle.index()]
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAction> {
        self.handle(name).map(|handle| self.action(handle))
    }

    /// Actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &RegisteredAction)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(index, action)| (ActionHandle::new(index), action))
    }

    pub fn groups(&self) -> &OutputGroupIndex {
        &self.groups
    }

    pub fn shapes(&self) -> &AssembledSchemas {
        &self.shapes
    }

    pub fn interchange(&self) -> &InterchangeSchema {
        &self.interchange
    }

    /// Warnings collected while building: ungroupable outputs and parameters
    /// no action can feed.
    pub fn diagnostics(&self) -> &[StructuredIssue] {
        &self.diagnostics
    }

    /// Whole-tree chain-shape check; empty when the tree is well formed.
    pub fn check_invocation(&self, invocation: &ActionInvocation) -> Vec<StructuredIssue> {
        self.shapes.check_invocation(self, invocation)
    }

    pub fn decode_interchange(&self, execution: &Value) -> Result<ActionInvocation, InvocationDecodeError> {
        ActionInvocation::from_interchange(execution, |name| self.contains(name))
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("actions", &self.actions)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

fn register_action(
    definition: ActionDefinition,
    name_pattern: &Regex,
) -> Result<RegisteredAction, ConfigurationError> {
    let ActionDefinition {
        declaration,
        executor,
    } = definition;
    let name = declaration.name.clone();

    if !name_pattern.is_match(name.as_str()) {
        return Err(ConfigurationError::InvalidActionName {
            name,
            reason: format!("must match {ACTION_NAME_PATTERN}"),
        });
    }
    if name.starts_with(OUTPUT_UNION_PREFIX_ROOT) {
        return Err(ConfigurationError::InvalidActionName {
            name,
            reason: format!("prefix `{OUTPUT_UNION_PREFIX_ROOT}` is reserved"),
        });
    }

    let mut seen = BTreeSet::new();
    for param in &declaration.params {
        if param.name.is_empty() {
            return Err(ConfigurationError::EmptyParamName { action: name });
        }
        if !seen.insert(param.name.as_str()) {
            return Err(ConfigurationError::DuplicateParam {
                action: name,
                param: param.name.clone(),
            });
        }
        param
            .schema
            .check_well_formed()
            .map_err(|source| ConfigurationError::MalformedType {
                action: name.clone(),
                location: format!("parameter `{}`", param.name),
                source,
            })?;
    }
    declaration
        .output
        .check_well_formed()
        .map_err(|source| ConfigurationError::MalformedType {
            action: name.clone(),
            location: "output".to_string(),
            source,
        })?;

    let compile_error = |source| ConfigurationError::SchemaCompile {
        action: name.clone(),
        source,
    };
    let input_validator = CompiledSchema::for_type(&declaration.input_schema()).map_err(compile_error)?;
    let output_validator = CompiledSchema::for_type(&declaration.output).map_err(compile_error)?;
    let output_identity = TypeIdentity::of(&declaration.output);

    Ok(RegisteredAction {
        declaration,
        executor,
        output_identity,
        input_validator,
        output_validator,
    })
}

fn collect_diagnostics(actions: &[RegisteredAction], groups: &OutputGroupIndex) -> Vec<StructuredIssue> {
    let mut issues = Vec::new();
    for action in actions {
        if action.output_identity.is_none() {
            issues.push(
                StructuredIssue::warning(
                    "registry_warning",
                    FieldPath::root().child_key("output"),
                    format!(
                        "output of `{}` contains an unknown type; it cannot feed other actions",
                        action.name()
                    ),
                    "registry.output.no_identity",
                )
                .with_action(action.name()),
            );
        }
        for param in &action.declaration.params {
            let fed = TypeIdentity::of(&param.schema)
                .map(|identity| !groups.producers(&identity).is_empty())
                .unwrap_or(false);
            if !fed {
                issues.push(
                    StructuredIssue::warning(
                        "registry_warning",
                        FieldPath::root().param(param.name.as_str()),
                        format!(
                            "no registered action produces the type of `{}.{}`; only literals are accepted",
                            action.name(),
                            param.name
                        ),
                        "registry.param.literal_only",
                    )
                    .with_action(action.name()),
                );
            }
        }
    }
    StructuredIssue::sort_stable(&mut issues);
    issues
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
