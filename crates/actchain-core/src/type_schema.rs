use crate::field_path::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectField {
    pub name: String,
    pub schema: TypeSchema,
}

/// Structural description of a value shape.
///
/// Objects are closed: every declared field is required and no other field is
/// accepted. `Unknown` accepts any value and never takes part in output
/// grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TypeSchemaRepr", into = "TypeSchemaRepr")]
pub enum TypeSchema {
    Primitive(PrimitiveKind),
    Object(Vec<ObjectField>),
    Array(Box<TypeSchema>),
    Union(Vec<TypeSchema>),
    Literal(Value),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeSchemaError {
    #[error("object field name must not be empty at {path}")]
    EmptyFieldName { path: FieldPath },
    #[error("duplicate object field `{name}` at {path}")]
    DuplicateField { path: FieldPath, name: String },
    #[error("union at {path} has no members")]
    EmptyUnion { path: FieldPath },
}

impl TypeSchema {
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> Self {
        Self::Primitive(PrimitiveKind::Null)
    }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeSchema)>,
        K: Into<String>,
    {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, schema)| ObjectField {
                    name: name.into(),
                    schema,
                })
                .collect(),
        )
    }

    pub fn array(items: TypeSchema) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn union(members: impl IntoIterator<Item = TypeSchema>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn unknown() -> Self {
        Self::Unknown
    }

    pub fn contains_unknown(&self) -> bool {
        match self {
            TypeSchema::Unknown => true,
            TypeSchema::Primitive(_) | TypeSchema::Literal(_) => false,
            TypeSchema::Object(fields) => fields.iter().any(|field| field.schema.contains_unknown()),
            TypeSchema::Array(items) => items.contains_unknown(),
            TypeSchema::Union(members) => members.iter().any(TypeSchema::contains_unknown),
        }
    }

    pub fn check_well_formed(&self) -> Result<(), TypeSchemaError> {
        self.check_at(&FieldPath::root())
    }

    fn check_at(&self, path: &FieldPath) -> Result<(), TypeSchemaError> {
        match self {
            TypeSchema::Primitive(_) | TypeSchema::Literal(_) | TypeSchema::Unknown => Ok(()),
            TypeSchema::Object(fields) => {
                let mut seen = BTreeSet::new();
                for field in fields {
                    if field.name.is_empty() {
                        return Err(TypeSchemaError::EmptyFieldName { path: path.clone() });
                    }
                    if !seen.insert(field.name.as_str()) {
                        return Err(TypeSchemaError::DuplicateField {
                            path: path.clone(),
                            name: field.name.clone(),
                        });
                    }
                    field.schema.check_at(&path.child_key(field.name.as_str()))?;
                }
                Ok(())
            }
            TypeSchema::Array(items) => {
                let mut item_path = path.clone();
                item_path.push_index(0);
                items.check_at(&item_path)
            }
            TypeSchema::Union(members) => {
                if members.is_empty() {
                    return Err(TypeSchemaError::EmptyUnion { path: path.clone() });
                }
                for (index, member) in members.iter().enumerate() {
                    let mut member_path = path.clone();
                    member_path.push_index(index);
                    member.check_at(&member_path)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum TypeSchemaRepr {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Object {
        #[serde(default)]
        fields: Vec<ObjectField>,
    },
    Array {
        items: Box<TypeSchema>,
    },
    Union {
        members: Vec<TypeSchema>,
    },
    Literal {
        value: Value,
    },
    Unknown,
}

impl From<TypeSchemaRepr> for TypeSchema {
    fn from(repr: TypeSchemaRepr) -> Self {
        match repr {
            TypeSchemaRepr::String => TypeSchema::string(),
            TypeSchemaRepr::Number => TypeSchema::number(),
            TypeSchemaRepr::Integer => TypeSchema::integer(),
            TypeSchemaRepr::Boolean => TypeSchema::boolean(),
            TypeSchemaRepr::Null => TypeSchema::null(),
            TypeSchemaRepr::Object { fields } => TypeSchema::Object(fields),
            TypeSchemaRepr::Array { items } => TypeSchema::Array(items),
            TypeSchemaRepr::Union { members } => TypeSchema::Union(members),
            TypeSchemaRepr::Literal { value } => TypeSchema::Literal(value),
            TypeSchemaRepr::Unknown => TypeSchema::Unknown,
        }
    }
}

impl From<TypeSchema> for TypeSchemaRepr {
    fn from(schema: TypeSchema) -> Self {
        match schema {
            TypeSchema::Primitive(PrimitiveKind::String) => TypeSchemaRepr::String,
            TypeSchema::Primitive(PrimitiveKind::Number) => TypeSchemaRepr::Number,
            TypeSchema::Primitive(PrimitiveKind::Integer) => TypeSchemaRepr::Integer,
            TypeSchema::Primitive(PrimitiveKind::Boolean) => TypeSchemaRepr::Boolean,
            TypeSchema::Primitive(PrimitiveKind::Null) => TypeSchemaRepr::Null,
            TypeSchema::Object(fields) => TypeSchemaRepr::Object { fields },
            TypeSchema::Array(items) => TypeSchemaRepr::Array { items },
            TypeSchema::Union(members) => TypeSchemaRepr::Union { members },
            TypeSchema::Literal(value) => TypeSchemaRepr::Literal { value },
            TypeSchema::Unknown => TypeSchemaRepr::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "type_schema_test.rs"]
mod tests;
