use actchain_core::TypeSchema;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Validated input handed to an action: one entry per declared parameter.
pub type ActionInput = Map<String, Value>;

pub trait ActionExecutor: Send + Sync {
    fn execute<'a>(&'a self, input: &'a ActionInput) -> BoxFuture<'a, Result<Value, String>>;
}

/// Adapts a synchronous closure into an [`ActionExecutor`].
pub struct FnExecutor<F>(F);

impl<F> FnExecutor<F>
where
    F: Fn(&ActionInput) -> Result<Value, String> + Send + Sync,
{
    pub fn new(function: F) -> Self {
        Self(function)
    }
}

impl<F> ActionExecutor for FnExecutor<F>
where
    F: Fn(&ActionInput) -> Result<Value, String> + Send + Sync,
{
    fn execute<'a>(&'a self, input: &'a ActionInput) -> BoxFuture<'a, Result<Value, String>> {
        future::ready((self.0)(input)).boxed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDeclaration {
    pub name: String,
    pub schema: TypeSchema,
}

/// Executor-free part of an action: its name, ordered parameters and output type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDeclaration {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDeclaration>,
    pub output: TypeSchema,
}

impl ActionDeclaration {
    pub fn new(name: impl Into<String>, output: TypeSchema) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            output,
        }
    }

    pub fn param(mut self, name: impl Into<String>, schema: TypeSchema) -> Self {
        self.params.push(ParamDeclaration {
            name: name.into(),
            schema,
        });
        self
    }

    pub fn param_schema(&self, name: &str) -> Option<&TypeSchema> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.schema)
    }

    /// The input object type: a closed object with one field per parameter.
    pub fn input_schema(&self) -> TypeSchema {
        TypeSchema::object(
            self.params
                .iter()
                .map(|param| (param.name.clone(), param.schema.clone())),
        )
    }
}

#[derive(Clone)]
pub struct ActionDefinition {
    pub declaration: ActionDeclaration,
    pub executor: Arc<dyn ActionExecutor>,
}

impl ActionDefinition {
    pub fn new(declaration: ActionDeclaration, executor: impl ActionExecutor + 'static) -> Self {
        Self {
            declaration,
            executor: Arc::new(executor),
        }
    }

    pub fn from_fn<F>(declaration: ActionDeclaration, function: F) -> Self
    where
        F: Fn(&ActionInput) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::new(declaration, FnExecutor::new(function))
    }

    pub fn name(&self) -> &str {
        self.declaration.name.as_str()
    }
}

impl Debug for ActionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod tests;
