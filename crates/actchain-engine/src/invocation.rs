use actchain_core::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A call to one action; parameters are literals or nested calls.
///
/// Native wire form keeps the two cases apart explicitly:
/// `{"action": "f", "params": {"x": {"literal": 3}, "y": {"invoke": {...}}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionInvocation {
    pub action: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ParamValue {
    Literal(Value),
    Invoke(Box<ActionInvocation>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed invocation at {path}: {reason}")]
pub struct InvocationDecodeError {
    pub path: FieldPath,
    pub reason: String,
}

impl ActionInvocation {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_literal(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .insert(name.into(), ParamValue::Literal(value.into()));
        self
    }

    pub fn with_invocation(mut self, name: impl Into<String>, invocation: ActionInvocation) -> Self {
        self.params
            .insert(name.into(), ParamValue::Invoke(Box::new(invocation)));
        self
    }

    /// Number of invocation nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .params
            .values()
            .map(|value| match value {
                ParamValue::Literal(_) => 0,
                ParamValue::Invoke(nested) => nested.node_count(),
            })
            .sum::<usize>()
    }

    /// Bare form used by the exported interchange schema: literals inline,
    /// nested calls as `{"action", "params"}` objects.
    pub fn to_interchange(&self) -> Value {
        let mut params = Map::new();
        for (name, value) in &self.params {
            let encoded = match value {
                ParamValue::Literal(literal) => literal.clone(),
                ParamValue::Invoke(nested) => nested.to_interchange(),
            };
            params.insert(name.clone(), encoded);
        }
        json!({ "action": self.action, "params": params })
    }

    /// Decodes the bare interchange form.
    ///
    /// A parameter value is a nested call only when it is an object with
    /// exactly the keys `action` and `params`, `action` is a string that
    /// `is_known_action` accepts and `params` is an object. Anything else is
    /// a literal.
    pub fn from_interchange<F>(value: &Value, is_known_action: F) -> Result<Self, InvocationDecodeError>
    where
        F: Fn(&str) -> bool + Copy,
    {
        decode_node(value, &FieldPath::root(), is_known_action)
    }
}

fn decode_node<F>(value: &Value, path: &FieldPath, is_known_action: F) -> Result<ActionInvocation, InvocationDecodeError>
where
    F: Fn(&str) -> bool + Copy,
{
    let object = value.as_object().ok_or_else(|| InvocationDecodeError {
        path: path.clone(),
        reason: "invocation must be an object".to_string(),
    })?;
    if let Some(extra) = object.keys().find(|key| *key != "action" && *key != "params") {
        return Err(InvocationDecodeError {
            path: path.clone(),
            reason: format!("unexpected field `{extra}`"),
        });
    }
    let action = object
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| InvocationDecodeError {
            path: path.clone(),
            reason: "`action` must be a string".to_string(),
        })?;
    let raw_params = object
        .get("params")
        .and_then(Value::as_object)
        .ok_or_else(|| InvocationDecodeError {
            path: path.clone(),
            reason: "`params` must be an object".to_string(),
        })?;

    let mut params = BTreeMap::new();
    for (name, raw) in raw_params {
        let decoded = if looks_like_invocation(raw, is_known_action) {
            ParamValue::Invoke(Box::new(decode_node(raw, &path.param(name), is_known_action)?))
        } else {
            ParamValue::Literal(raw.clone())
        };
        params.insert(name.clone(), decoded);
    }

    Ok(ActionInvocation {
        action: action.to_string(),
        params,
    })
}

fn looks_like_invocation<F>(value: &Value, is_known_action: F) -> bool
where
    F: Fn(&str) -> bool,
{
    let Some(object) = value.as_object() else {
        return false;
    };
    object.len() == 2
        && object.get("params").is_some_and(Value::is_object)
        && object
            .get("action")
            .and_then(Value::as_str)
            .is_some_and(is_known_action)
}

#[cfg(test)]
#[path = "invocation_test.rs"]
mod tests;
