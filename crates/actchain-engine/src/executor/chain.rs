use crate::action::{ActionDefinition, ActionInput};
use crate::events::{ChainEvent, ChainEventLog, ChainEventRecord, ChainEventType};
use crate::invocation::{ActionInvocation, InvocationDecodeError, ParamValue};
use crate::registry::{ConfigurationError, Registry};
use actchain_core::{FieldPath, StructuredIssue};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

use super::ExecutorOptions;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("unknown action `{action}` at {path}")]
    UnknownAction { action: String, path: FieldPath },
    #[error("invalid input for `{action}` at {path}: {}", StructuredIssue::summarize(.issues))]
    InputValidation {
        action: String,
        path: FieldPath,
        issues: Vec<StructuredIssue>,
    },
    #[error("invocation does not match the chain schema: {}", StructuredIssue::summarize(.issues))]
    ChainShape { issues: Vec<StructuredIssue> },
    #[error("action `{action}` failed at {path}: {reason}")]
    Execution {
        action: String,
        path: FieldPath,
        reason: String,
    },
    #[error("output of `{action}` at {path} does not match its declared type: {}", StructuredIssue::summarize(.issues))]
    OutputValidation {
        action: String,
        path: FieldPath,
        issues: Vec<StructuredIssue>,
    },
    #[error(transparent)]
    MalformedInvocation(#[from] InvocationDecodeError),
}

impl ChainError {
    pub fn action(&self) -> Option<&str> {
        match self {
            ChainError::UnknownAction { action, .. }
            | ChainError::InputValidation { action, .. }
            | ChainError::Execution { action, .. }
            | ChainError::OutputValidation { action, .. } => Some(action.as_str()),
            ChainError::ChainShape { .. } | ChainError::MalformedInvocation(_) => None,
        }
    }

    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            ChainError::UnknownAction { path, .. }
            | ChainError::InputValidation { path, .. }
            | ChainError::Execution { path, .. }
            | ChainError::OutputValidation { path, .. } => Some(path),
            ChainError::MalformedInvocation(error) => Some(&error.path),
            ChainError::ChainShape { .. } => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ChainError::UnknownAction { .. } => "unknown_action",
            ChainError::InputValidation { .. } => "input_validation",
            ChainError::ChainShape { .. } => "chain_shape",
            ChainError::Execution { .. } => "execution",
            ChainError::OutputValidation { .. } => "output_validation",
            ChainError::MalformedInvocation(_) => "malformed_invocation",
        }
    }
}

/// Result of a traced execution together with its event records.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun {
    pub result: Result<Value, ChainError>,
    pub events: Vec<ChainEventRecord>,
}

/// Runs invocation trees against a shared, read-only [`Registry`].
#[derive(Debug, Clone)]
pub struct ChainExecutor {
    registry: Arc<Registry>,
    options: ExecutorOptions,
}

pub fn create_executor(actions: Vec<ActionDefinition>) -> Result<ChainExecutor, ConfigurationError> {
    Ok(ChainExecutor::new(Arc::new(Registry::new(actions)?)))
}

impl ChainExecutor {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn exported_schema(&self) -> &Value {
        self.registry.interchange().document()
    }

    pub async fn execute(&self, invocation: &ActionInvocation) -> Result<Value, ChainError> {
        let mut log = ChainEventLog::new("");
        self.run(invocation, &mut log).await
    }

    pub async fn execute_traced(&self, invocation: &ActionInvocation, run_id: impl Into<String>) -> ChainRun {
        let mut log = ChainEventLog::new(run_id);
        let result = self.run(invocation, &mut log).await;
        ChainRun {
            result,
            events: log.into_records(),
        }
    }

    /// Executes a `{"execution": ...}` document in the exported interchange form.
    pub async fn execute_interchange(&self, document: &Value) -> Result<Value, ChainError> {
        if self.options.check_chain_shape {
            let issues = self.registry.interchange().validate(document);
            if !issues.is_empty() {
                return Err(ChainError::ChainShape { issues });
            }
        }
        let execution = document
            .as_object()
            .and_then(|object| object.get("execution"))
            .ok_or_else(|| InvocationDecodeError {
                path: FieldPath::root(),
                reason: "document must carry `execution`".to_string(),
            })?;
        let invocation = self.registry.decode_interchange(execution)?;
        self.execute(&invocation).await
    }

    async fn run(&self, invocation: &ActionInvocation, log: &mut ChainEventLog) -> Result<Value, ChainError> {
        let result = self.check_and_resolve(invocation, log).await;
        if let Err(error) = &result {
            tracing::debug!(error = %error, "chain execution failed");
            let mut event = ChainEvent::new(ChainEventType::NodeFailed)
                .with_data("kind", json!(error.kind()))
                .with_data("message", json!(error.to_string()));
            if let Some(action) = error.action() {
                event = event.with_action(action);
            }
            if let Some(path) = error.path() {
                event = event.at(path);
            }
            log.push(event);
        }
        result
    }

    async fn check_and_resolve(
        &self,
        invocation: &ActionInvocation,
        log: &mut ChainEventLog,
    ) -> Result<Value, ChainError> {
        if self.options.check_chain_shape {
            if self.registry.handle(invocation.action.as_str()).is_none() {
                return Err(ChainError::UnknownAction {
                    action: invocation.action.clone(),
                    path: FieldPath::root(),
                });
            }
            let issues = self.registry.check_invocation(invocation);
            if !issues.is_empty() {
                return Err(ChainError::ChainShape { issues });
            }
            log.push(
                ChainEvent::new(ChainEventType::ChainAccepted)
                    .with_data("nodes", json!(invocation.node_count())),
            );
        }
        self.resolve_node(invocation, FieldPath::root(), log).await
    }

    fn resolve_node<'a>(
        &'a self,
        invocation: &'a ActionInvocation,
        path: FieldPath,
        log: &'a mut ChainEventLog,
    ) -> BoxFuture<'a, Result<Value, ChainError>> {
        async move {
            let registry = self.registry.as_ref();
            let action_name = invocation.action.as_str();
            let handle = registry
                .handle(action_name)
                .ok_or_else(|| ChainError::UnknownAction {
                    action: action_name.to_string(),
                    path: path.clone(),
                })?;
            let action = registry.action(handle);
            let shape = registry.shapes().shape(handle);

            tracing::debug!(action = action_name, path = %path, "resolving node");
            log.push(
                ChainEvent::new(ChainEventType::NodeResolving)
                    .with_action(action_name)
                    .at(&path),
            );

            let undeclared = invocation
                .params
                .keys()
                .filter(|name| shape.param(name).is_none())
                .map(|name| {
                    input_issue(
                        path.param(name),
                        format!("`{action_name}` has no parameter `{name}`"),
                        "chain.input.undeclared_param",
                    )
                })
                .collect::<Vec<_>>();
            if !undeclared.is_empty() {
                return Err(input_error(action_name, &path, undeclared));
            }

            let mut input = ActionInput::new();
            for param in shape.params() {
                let Some(value) = invocation.params.get(param.name()) else {
                    continue;
                };
                let param_path = path.param(param.name());
                let resolved = match value {
                    ParamValue::Literal(literal) => literal.clone(),
                    ParamValue::Invoke(nested) => {
                        let nested_handle = registry.handle(nested.action.as_str()).ok_or_else(|| {
                            ChainError::UnknownAction {
                                action: nested.action.clone(),
                                path: param_path.clone(),
                            }
                        })?;
                        if !param.accepts_producer(nested_handle) {
                            let produced = registry.action(nested_handle).output_identity();
                            let issue = input_issue(
                                param_path,
                                format!(
                                    "`{}` does not produce the type expected by `{action_name}.{}`",
                                    nested.action,
                                    param.name()
                                ),
                                "chain.input.identity_mismatch",
                            )
                            .with_related(json!({
                                "expected": param.identity(),
                                "actual": produced,
                            }));
                            return Err(input_error(action_name, &path, vec![issue]));
                        }
                        self.resolve_node(nested, param_path, &mut *log).await?
                    }
                };
                input.insert(param.name().to_string(), resolved);
            }

            let issues = action
                .input_validator()
                .validate_at(&Value::Object(input.clone()), &path.child_key("params"));
            if !issues.is_empty() {
                return Err(input_error(action_name, &path, issues));
            }
            log.push(
                ChainEvent::new(ChainEventType::NodeValidated)
                    .with_action(action_name)
                    .at(&path),
            );

            let output = action
                .executor()
                .execute(&input)
                .await
                .map_err(|reason| ChainError::Execution {
                    action: action_name.to_string(),
                    path: path.clone(),
                    reason,
                })?;

            if self.options.validate_outputs {
                let mut issues = action.output_validator().validate_at(&output, &path);
                if !issues.is_empty() {
                    for issue in &mut issues {
                        issue.kind = "output_validation".to_string();
                        issue.action = Some(action_name.to_string());
                    }
                    return Err(ChainError::OutputValidation {
                        action: action_name.to_string(),
                        path,
                        issues,
                    });
                }
            }

            tracing::debug!(action = action_name, path = %path, "node executed");
            log.push(
                ChainEvent::new(ChainEventType::NodeExecuted)
                    .with_action(action_name)
                    .at(&path),
            );
            Ok(output)
        }
        .boxed()
    }
}

fn input_issue(path: FieldPath, message: String, reference: &str) -> StructuredIssue {
    StructuredIssue::error("input_validation", path, message, reference)
}

fn input_error(action: &str, path: &FieldPath, issues: Vec<StructuredIssue>) -> ChainError {
    let mut issues = issues
        .into_iter()
        .map(|mut issue| {
            issue.kind = "input_validation".to_string();
            issue.with_action(action)
        })
        .collect::<Vec<_>>();
    StructuredIssue::sort_stable(&mut issues);
    ChainError::InputValidation {
        action: action.to_string(),
        path: path.clone(),
        issues,
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
