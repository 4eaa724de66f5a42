use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Serializes `value` with object keys in sorted order at every depth.
pub fn stable_json_bytes(value: &Value) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&normalize_value(value))
}

pub fn stable_json_string(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string(&normalize_value(value))
}

pub fn stable_json_pretty(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&normalize_value(value))
}

fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Object(object) => normalize_object(object),
        Value::Array(items) => Value::Array(items.iter().map(normalize_value).collect()),
        _ => value.clone(),
    }
}

fn normalize_object(object: &Map<String, Value>) -> Value {
    let ordered = object
        .iter()
        .map(|(key, value)| (key.clone(), normalize_value(value)))
        .collect::<BTreeMap<_, _>>();

    let mut out = Map::new();
    for (key, value) in ordered {
        out.insert(key, value);
    }
    Value::Object(out)
}

#[cfg(test)]
#[path = "stable_json_test.rs"]
mod tests;
