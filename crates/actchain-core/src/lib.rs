pub mod field_path;
pub mod identity;
pub mod issues;
pub mod stable_hash;
pub mod stable_json;
pub mod type_schema;

pub use field_path::{FieldPath, FieldPathSegment};
pub use identity::{type_signature, TypeIdentity, IDENTITY_HEX_LEN, UNKNOWN_SIGNATURE};
pub use issues::{IssueSeverity, StructuredIssue};
pub use stable_hash::{short_hash_hex, stable_hash_hex};
pub use stable_json::{stable_json_bytes, stable_json_pretty, stable_json_string};
pub use type_schema::{ObjectField, PrimitiveKind, TypeSchema, TypeSchemaError};
