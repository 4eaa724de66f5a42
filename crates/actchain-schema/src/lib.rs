pub mod json_schema;
pub mod validate;

pub use json_schema::type_schema_to_json_schema;
pub use validate::{CompiledSchema, SchemaCompileError};
