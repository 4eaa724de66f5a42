//! Structural type identity.
//!
//! The signature is the canonical serialization every identity is hashed from:
//!
//! - primitives: `string`, `number`, `integer`, `boolean`, `null`
//! - object: `object{"a":<sig>,"b":<sig>}` with fields sorted by name
//! - array: `array<<sig>>`
//! - union: nested unions flattened, members sorted and de-duplicated,
//!   a single member collapses to itself, otherwise `union(<sig>|<sig>)`
//! - literal: `literal(<json with sorted keys>)`, whole-number floats written
//!   as integers so `1` and `1.0` sign alike (JSON Schema `const` equates them)
//! - unknown: `unknown`
//!
//! Identity is the first 16 hex characters of the SHA-256 of the signature.
//! Shapes containing `unknown` have no identity.

use crate::stable_hash::short_hash_hex;
use crate::stable_json::stable_json_string;
use crate::type_schema::TypeSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

pub const IDENTITY_HEX_LEN: usize = 16;
pub const UNKNOWN_SIGNATURE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeIdentity(String);

impl TypeIdentity {
    pub fn of(schema: &TypeSchema) -> Option<Self> {
        if schema.contains_unknown() {
            return None;
        }
        Some(Self::from_signature(type_signature(schema).as_str()))
    }

    pub fn from_signature(signature: &str) -> Self {
        Self(short_hash_hex(signature, IDENTITY_HEX_LEN))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TypeIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

pub fn type_signature(schema: &TypeSchema) -> String {
    match schema {
        TypeSchema::Primitive(kind) => kind.as_str().to_string(),
        TypeSchema::Object(fields) => {
            let mut entries = fields
                .iter()
                .map(|field| (field.name.as_str(), type_signature(&field.schema)))
                .collect::<Vec<_>>();
            entries.sort_by(|left, right| left.0.cmp(right.0));
            let body = entries
                .into_iter()
                .map(|(name, signature)| format!("{}:{signature}", quote(name)))
                .collect::<Vec<_>>()
                .join(",");
            format!("object{{{body}}}")
        }
        TypeSchema::Array(items) => format!("array<{}>", type_signature(items)),
        TypeSchema::Union(members) => {
            let mut signatures = BTreeSet::new();
            collect_union_signatures(members, &mut signatures);
            if signatures.len() == 1 {
                return signatures.into_iter().next().unwrap_or_default();
            }
            let body = signatures.into_iter().collect::<Vec<_>>().join("|");
            format!("union({body})")
        }
        TypeSchema::Literal(value) => {
            let value = normalize_numbers(value);
            let canonical = stable_json_string(&value).unwrap_or_else(|_| value.to_string());
            format!("literal({canonical})")
        }
        TypeSchema::Unknown => UNKNOWN_SIGNATURE.to_string(),
    }
}

fn collect_union_signatures(members: &[TypeSchema], out: &mut BTreeSet<String>) {
    for member in members {
        match member {
            TypeSchema::Union(nested) => collect_union_signatures(nested, out),
            other => {
                out.insert(type_signature(other));
            }
        }
    }
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_FLOAT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < EXACT_FLOAT_INTEGER_LIMIT => {
                Value::from(float as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), normalize_numbers(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn quote(name: &str) -> String {
    serde_json::Value::String(name.to_string()).to_string()
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
