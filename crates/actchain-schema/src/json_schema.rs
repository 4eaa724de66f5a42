use actchain_core::{type_signature, TypeSchema};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Canonical JSON Schema for a [`TypeSchema`].
///
/// Structurally equal types produce identical documents: `required` lists are
/// sorted, union members are sorted by signature and de-duplicated.
pub fn type_schema_to_json_schema(schema: &TypeSchema) -> Value {
    match schema {
        TypeSchema::Primitive(kind) => json!({ "type": kind.as_str() }),
        TypeSchema::Object(fields) => {
            let mut properties = Map::new();
            let sorted = fields
                .iter()
                .map(|field| (field.name.as_str(), &field.schema))
                .collect::<BTreeMap<_, _>>();
            for (name, field_schema) in &sorted {
                properties.insert(name.to_string(), type_schema_to_json_schema(field_schema));
            }
            let required = sorted.keys().map(|name| Value::String(name.to_string())).collect::<Vec<_>>();
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
        TypeSchema::Array(items) => json!({
            "type": "array",
            "items": type_schema_to_json_schema(items),
        }),
        TypeSchema::Union(members) => {
            let mut by_signature = BTreeMap::new();
            collect_union_members(members, &mut by_signature);
            if by_signature.len() == 1 {
                if let Some(only) = by_signature.into_values().next() {
                    return type_schema_to_json_schema(only);
                }
                return json!({});
            }
            let any_of = by_signature
                .into_values()
                .map(type_schema_to_json_schema)
                .collect::<Vec<_>>();
            json!({ "anyOf": any_of })
        }
        TypeSchema::Literal(value) => json!({ "const": value }),
        TypeSchema::Unknown => json!({}),
    }
}

fn collect_union_members<'a>(members: &'a [TypeSchema], out: &mut BTreeMap<String, &'a TypeSchema>) {
    for member in members {
        match member {
            TypeSchema::Union(nested) => collect_union_members(nested, out),
            other => {
                out.entry(type_signature(other)).or_insert(other);
            }
        }
    }
}

#[cfg(test)]
#[path = "json_schema_test.rs"]
mod tests;
