use super::{ObjectField, TypeSchema, TypeSchemaError};
use crate::FieldPath;
use serde_json::json;

#[test]
fn tagged_document_decodes_nested_shapes() {
    let schema: TypeSchema = serde_json::from_value(json!({
        "type": "object",
        "fields": [
            {"name": "label", "schema": {"type": "string"}},
            {"name": "tags", "schema": {"type": "array", "items": {"type": "string"}}},
            {"name": "mode", "schema": {"type": "union", "members": [
                {"type": "literal", "value": "fast"},
                {"type": "null"}
            ]}}
        ]
    }))
    .expect("must decode");

    assert_eq!(
        schema,
        TypeSchema::object([
            ("label", TypeSchema::string()),
            ("tags", TypeSchema::array(TypeSchema::string())),
            (
                "mode",
                TypeSchema::union([TypeSchema::literal("fast"), TypeSchema::null()])
            ),
        ])
    );
}

#[test]
fn primitives_encode_as_bare_type_tags() {
    let value = serde_json::to_value(TypeSchema::integer()).expect("must encode");
    assert_eq!(value, json!({"type": "integer"}));
}

#[test]
fn unsupported_type_tags_are_rejected() {
    let error = serde_json::from_value::<TypeSchema>(json!({"type": "date"}))
        .expect_err("must reject");
    assert!(error.to_string().contains("date"));
}

#[test]
fn duplicate_object_fields_are_malformed() {
    let schema = TypeSchema::Object(vec![
        ObjectField {
            name: "x".to_string(),
            schema: TypeSchema::number(),
        },
        ObjectField {
            name: "x".to_string(),
            schema: TypeSchema::string(),
        },
    ]);
    assert_eq!(
        schema.check_well_formed(),
        Err(TypeSchemaError::DuplicateField {
            path: FieldPath::root(),
            name: "x".to_string(),
        })
    );
}

#[test]
fn nested_empty_union_reports_its_path() {
    let schema = TypeSchema::object([("choice", TypeSchema::union([]))]);
    let error = schema.check_well_formed().expect_err("must reject");
    assert_eq!(error.to_string(), "union at $.choice has no members");
}

#[test]
fn contains_unknown_looks_through_containers() {
    assert!(TypeSchema::array(TypeSchema::unknown()).contains_unknown());
    assert!(TypeSchema::object([("a", TypeSchema::union([TypeSchema::unknown()]))]).contains_unknown());
    assert!(!TypeSchema::object([("a", TypeSchema::number())]).contains_unknown());
}
