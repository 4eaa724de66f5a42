use super::{ActionDeclaration, ActionDefinition, ActionInput};
use actchain_core::TypeSchema;
use futures::executor::block_on;
use serde_json::json;

#[test]
fn input_schema_keeps_parameter_order() {
    let declaration = ActionDeclaration::new("distance", TypeSchema::number())
        .param("to", TypeSchema::string())
        .param("from", TypeSchema::string());
    assert_eq!(
        declaration.input_schema(),
        TypeSchema::object([("to", TypeSchema::string()), ("from", TypeSchema::string())])
    );
    assert_eq!(declaration.param_schema("from"), Some(&TypeSchema::string()));
    assert_eq!(declaration.param_schema("via"), None);
}

#[test]
fn declarations_decode_from_manifest_documents() {
    let declaration: ActionDeclaration = serde_json::from_value(json!({
        "name": "numberToString",
        "params": [{"name": "num", "schema": {"type": "number"}}],
        "output": {"type": "string"}
    }))
    .expect("must decode");
    assert_eq!(
        declaration,
        ActionDeclaration::new("numberToString", TypeSchema::string()).param("num", TypeSchema::number())
    );
}

#[test]
fn fn_executor_runs_the_closure() {
    let action = ActionDefinition::from_fn(
        ActionDeclaration::new("echo", TypeSchema::string()).param("text", TypeSchema::string()),
        |input| Ok(input["text"].clone()),
    );
    let mut input = ActionInput::new();
    input.insert("text".to_string(), json!("hi"));
    let output = block_on(action.executor.execute(&input)).expect("must run");
    assert_eq!(output, json!("hi"));
    assert_eq!(action.name(), "echo");
}
