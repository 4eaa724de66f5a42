use super::{ActionHandle, ConfigurationError, Registry};
use crate::action::{ActionDeclaration, ActionDefinition};
use crate::invocation::{ActionInvocation, ParamValue};
use crate::test_fixtures::{call_log, concat, conversion_actions};
use actchain_core::{IssueSeverity, TypeIdentity, TypeSchema};
use serde_json::{json, Value};

fn declared(declaration: ActionDeclaration) -> ActionDefinition {
    ActionDefinition::from_fn(declaration, |_| Ok(Value::Null))
}

#[test]
fn handles_follow_registration_order() {
    let calls = call_log();
    let mut actions = conversion_actions(&calls);
    actions.push(concat(&calls));
    let registry = Registry::new(actions).expect("registry must build");

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.handle("numberToString"), Some(ActionHandle::new(0)));
    assert_eq!(registry.handle("concat"), Some(ActionHandle::new(2)));
    assert!(registry.contains("stringToNumber"));
    assert!(registry.get("shout").is_none());
    let names = registry
        .actions()
        .map(|(_, action)| action.name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["numberToString", "stringToNumber", "concat"]);
}

#[test]
fn actions_with_the_same_output_share_a_group() {
    let calls = call_log();
    let mut actions = conversion_actions(&calls);
    actions.push(concat(&calls));
    let registry = Registry::new(actions).expect("registry must build");

    let string = TypeIdentity::of(&TypeSchema::string()).expect("identity");
    let number = TypeIdentity::of(&TypeSchema::number()).expect("identity");
    assert_eq!(
        registry.groups().producers(&string),
        &[ActionHandle::new(0), ActionHandle::new(2)]
    );
    assert_eq!(registry.groups().producers(&number), &[ActionHandle::new(1)]);
    assert_eq!(
        registry.get("concat").and_then(|action| action.output_identity()),
        Some(&string)
    );
}

#[test]
fn empty_action_set_is_rejected() {
    assert!(matches!(Registry::new(Vec::new()), Err(ConfigurationError::Empty)));
}

#[test]
fn invalid_and_reserved_names_are_rejected() {
    for name in ["", "1st", "has space", "ActionUnionAll", "ActionUnionThatOutputs_x"] {
        let result = Registry::new(vec![declared(ActionDeclaration::new(name, TypeSchema::null()))]);
        assert!(
            matches!(result, Err(ConfigurationError::InvalidActionName { .. })),
            "`{name}` must be rejected"
        );
    }
    assert!(Registry::new(vec![declared(ActionDeclaration::new("erc20.transfer-v2", TypeSchema::null()))]).is_ok());
}

#[test]
fn duplicate_action_names_are_rejected() {
    let result = Registry::new(vec![
        declared(ActionDeclaration::new("ping", TypeSchema::null())),
        declared(ActionDeclaration::new("ping", TypeSchema::boolean())),
    ]);
    match result {
        Err(ConfigurationError::DuplicateAction { name }) => assert_eq!(name, "ping"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn parameter_names_must_be_unique_and_non_empty() {
    let duplicate = Registry::new(vec![declared(
        ActionDeclaration::new("pair", TypeSchema::null())
            .param("x", TypeSchema::number())
            .param("x", TypeSchema::string()),
    )]);
    assert!(matches!(
        duplicate,
        Err(ConfigurationError::DuplicateParam { ref param, .. }) if param == "x"
    ));

    let empty = Registry::new(vec![declared(
        ActionDeclaration::new("blank", TypeSchema::null()).param("", TypeSchema::number()),
    )]);
    assert!(matches!(empty, Err(ConfigurationError::EmptyParamName { .. })));
}

#[test]
fn malformed_types_name_their_location() {
    let result = Registry::new(vec![declared(
        ActionDeclaration::new("choose", TypeSchema::union([]))
            .param("x", TypeSchema::number()),
    )]);
    let error = result.expect_err("must fail");
    assert!(matches!(
        error,
        ConfigurationError::MalformedType { ref location, .. } if location == "output"
    ));
    assert!(error.to_string().starts_with("action `choose` has a malformed output type"));
}

#[test]
fn diagnostics_flag_unknown_outputs_and_unfed_params() {
    let registry = Registry::new(vec![
        declared(ActionDeclaration::new("fetch", TypeSchema::unknown()).param("url", TypeSchema::string())),
        declared(ActionDeclaration::new("describe", TypeSchema::string()).param("value", TypeSchema::unknown())),
    ])
    .expect("registry must build");

    let references = registry
        .diagnostics()
        .iter()
        .map(|issue| {
            assert_eq!(issue.severity, IssueSeverity::Warning);
            (
                issue.action.as_deref().unwrap_or_default(),
                issue.reference.as_deref().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    assert!(references.contains(&("fetch", "registry.output.no_identity")));
    assert!(references.contains(&("describe", "registry.param.literal_only")));
    assert!(!references.contains(&("fetch", "registry.param.literal_only")));
    assert!(registry.groups().identities().count() == 1);
}

#[test]
fn interchange_decoding_only_nests_registered_actions() {
    let calls = call_log();
    let registry = Registry::new(conversion_actions(&calls)).expect("registry must build");

    let invocation = registry
        .decode_interchange(&json!({
            "action": "stringToNumber",
            "params": {"text": {"action": "numberToString", "params": {"num": 3}}}
        }))
        .expect("must decode");
    assert_eq!(
        invocation,
        ActionInvocation::new("stringToNumber")
            .with_invocation("text", ActionInvocation::new("numberToString").with_literal("num", 3))
    );

    let literal = registry
        .decode_interchange(&json!({
            "action": "stringToNumber",
            "params": {"text": {"action": "shout", "params": {}}}
        }))
        .expect("must decode");
    assert!(matches!(literal.params.get("text"), Some(ParamValue::Literal(_))));
}
