//! Per-action invocation shapes.
//!
//! Shapes live in an arena indexed by [`ActionHandle`]. Every action owns a
//! slot before any slot is filled, and a parameter refers to the actions that
//! can feed it by handle, so mutually recursive actions never need to embed
//! each other.

use crate::invocation::{ActionInvocation, ParamValue};
use crate::registry::{ActionHandle, ConfigurationError, OutputGroupIndex, RegisteredAction, Registry};
use actchain_core::{FieldPath, StructuredIssue, TypeIdentity};
use actchain_schema::CompiledSchema;

/// One parameter: its literal type, or a call to any of `producers`.
#[derive(Debug)]
pub struct ParamShape {
    name: String,
    identity: Option<TypeIdentity>,
    literal: CompiledSchema,
    producers: Vec<ActionHandle>,
}

impl ParamShape {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn identity(&self) -> Option<&TypeIdentity> {
        self.identity.as_ref()
    }

    pub fn literal(&self) -> &CompiledSchema {
        &self.literal
    }

    /// Actions whose output identity equals this parameter's, in registration order.
    pub fn producers(&self) -> &[ActionHandle] {
        &self.producers
    }

    pub fn accepts_producer(&self, handle: ActionHandle) -> bool {
        self.producers.contains(&handle)
    }
}

#[derive(Debug, Default)]
pub struct InvocationShape {
    params: Vec<ParamShape>,
}

impl InvocationShape {
    pub fn params(&self) -> &[ParamShape] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamShape> {
        self.params.iter().find(|param| param.name == name)
    }
}

#[derive(Debug, Default)]
pub struct AssembledSchemas {
    shapes: Vec<InvocationShape>,
}

impl AssembledSchemas {
    pub(crate) fn assemble(
        actions: &[RegisteredAction],
        groups: &OutputGroupIndex,
    ) -> Result<Self, ConfigurationError> {
        let mut shapes = actions
            .iter()
            .map(|_| InvocationShape::default())
            .collect::<Vec<_>>();

        for (slot, action) in shapes.iter_mut().zip(actions) {
            for param in &action.declaration().params {
                let identity = TypeIdentity::of(&param.schema);
                let producers = identity
                    .as_ref()
                    .map(|identity| groups.producers(identity).to_vec())
                    .unwrap_or_default();
                let literal = CompiledSchema::for_type(&param.schema).map_err(|source| {
                    ConfigurationError::SchemaCompile {
                        action: action.name().to_string(),
                        source,
                    }
                })?;
                slot.params.push(ParamShape {
                    name: param.name.clone(),
                    identity,
                    literal,
                    producers,
                });
            }
        }

        Ok(Self { shapes })
    }

    pub fn shape(&self, handle: ActionHandle) -> &InvocationShape {
        &self.shapes[handle.index()]
    }

    pub fn check_invocation(&self, registry: &Registry, invocation: &ActionInvocation) -> Vec<StructuredIssue> {
        let mut issues = Vec::new();
        self.check_node(registry, invocation, &FieldPath::root(), &mut issues);
        StructuredIssue::sort_stable(&mut issues);
        issues
    }

    fn check_node(
        &self,
        registry: &Registry,
        invocation: &ActionInvocation,
        path: &FieldPath,
        issues: &mut Vec<StructuredIssue>,
    ) {
        let action = invocation.action.as_str();
        let Some(handle) = registry.handle(action) else {
            issues.push(shape_issue(
                path.child_key("action"),
                format!("unknown action `{action}`"),
                "chain.shape.unknown_action",
            ));
            return;
        };
        let shape = self.shape(handle);

        for name in invocation.params.keys() {
            if shape.param(name).is_none() {
                issues.push(
                    shape_issue(
                        path.param(name),
                        format!("`{action}` has no parameter `{name}`"),
                        "chain.shape.undeclared_param",
                    )
                    .with_action(action),
                );
            }
        }

        for param in &shape.params {
            let param_path = path.param(param.name());
            match invocation.params.get(param.name()) {
                None => issues.push(
                    shape_issue(
                        param_path,
                        format!("missing parameter `{}`", param.name()),
                        "chain.shape.missing_param",
                    )
                    .with_action(action),
                ),
                Some(ParamValue::Literal(value)) => issues.extend(
                    param
                        .literal()
                        .validate_at(value, &param_path)
                        .into_iter()
                        .map(|mut issue| {
                            issue.kind = "chain_shape".to_string();
                            issue.with_action(action)
                        }),
                ),
                Some(ParamValue::Invoke(nested)) => match registry.handle(nested.action.as_str()) {
                    None => issues.push(
                        shape_issue(
                            param_path.child_key("action"),
                            format!("unknown action `{}`", nested.action),
                            "chain.shape.unknown_action",
                        )
                        .with_action(action),
                    ),
                    Some(nested_handle) if !param.accepts_producer(nested_handle) => issues.push(
                        shape_issue(
                            param_path,
                            format!(
                                "`{}` does not produce the type expected by `{action}.{}`",
                                nested.action,
                                param.name()
                            ),
                            "chain.shape.incompatible_producer",
                        )
                        .with_action(action),
                    ),
                    Some(_) => self.check_node(registry, nested, &param_path, issues),
                },
            }
        }
    }
}

fn shape_issue(path: FieldPath, message: String, reference: &str) -> StructuredIssue {
    StructuredIssue::error("chain_shape", path, message, reference)
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod tests;
