use crate::action::{ActionDeclaration, ActionDefinition, ActionInput};
use actchain_core::TypeSchema;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn recorded(calls: &CallLog) -> Vec<String> {
    calls.lock().expect("call log lock").clone()
}

fn recording<F>(declaration: ActionDeclaration, calls: &CallLog, function: F) -> ActionDefinition
where
    F: Fn(&ActionInput) -> Result<Value, String> + Send + Sync + 'static,
{
    let calls = Arc::clone(calls);
    let name = declaration.name.clone();
    ActionDefinition::from_fn(declaration, move |input| {
        calls.lock().expect("call log lock").push(name.clone());
        function(input)
    })
}

pub(crate) fn number_to_string(calls: &CallLog) -> ActionDefinition {
    recording(
        ActionDeclaration::new("numberToString", TypeSchema::string()).param("num", TypeSchema::number()),
        calls,
        |input| Ok(Value::String(input["num"].to_string())),
    )
}

pub(crate) fn string_to_number(calls: &CallLog) -> ActionDefinition {
    recording(
        ActionDeclaration::new("stringToNumber", TypeSchema::number()).param("text", TypeSchema::string()),
        calls,
        |input| {
            let text = input["text"].as_str().unwrap_or_default();
            if let Ok(integer) = text.parse::<i64>() {
                return Ok(json!(integer));
            }
            text.parse::<f64>()
                .map(|number| json!(number))
                .map_err(|_| format!("`{text}` is not a number"))
        },
    )
}

pub(crate) fn concat(calls: &CallLog) -> ActionDefinition {
    recording(
        ActionDeclaration::new("concat", TypeSchema::string())
            .param("left", TypeSchema::string())
            .param("right", TypeSchema::string()),
        calls,
        |input| {
            let left = input["left"].as_str().unwrap_or_default();
            let right = input["right"].as_str().unwrap_or_default();
            Ok(Value::String(format!("{left}{right}")))
        },
    )
}

pub(crate) fn conversion_actions(calls: &CallLog) -> Vec<ActionDefinition> {
    vec![number_to_string(calls), string_to_number(calls)]
}
