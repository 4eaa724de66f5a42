use crate::action::{ActionDeclaration, ActionDefinition};
use crate::invocation::ActionInvocation;
use crate::registry::{ActionHandle, Registry};
use crate::test_fixtures::{call_log, concat, conversion_actions};
use actchain_core::{TypeIdentity, TypeSchema};
use serde_json::json;

fn registry() -> Registry {
    let calls = call_log();
    let mut actions = conversion_actions(&calls);
    actions.push(concat(&calls));
    Registry::new(actions).expect("registry must build")
}

fn references(registry: &Registry, invocation: &ActionInvocation) -> Vec<String> {
    registry
        .check_invocation(invocation)
        .into_iter()
        .map(|issue| format!("{} {}", issue.field_path, issue.reference.unwrap_or_default()))
        .collect()
}

#[test]
fn params_point_at_every_producer_of_their_type() {
    let registry = registry();
    let concat = registry.handle("concat").expect("registered");
    let shape = registry.shapes().shape(concat);

    let names = shape.params().iter().map(|param| param.name()).collect::<Vec<_>>();
    assert_eq!(names, vec!["left", "right"]);
    let left = shape.param("left").expect("declared");
    assert_eq!(left.identity(), TypeIdentity::of(&TypeSchema::string()).as_ref());
    assert_eq!(left.producers(), &[ActionHandle::new(0), ActionHandle::new(2)]);
    assert!(left.literal().is_valid(&json!("text")));
    assert!(!left.literal().is_valid(&json!(1)));
}

#[test]
fn self_referential_actions_assemble() {
    let wrap = ActionDefinition::from_fn(
        ActionDeclaration::new("wrap", TypeSchema::array(TypeSchema::number()))
            .param("inner", TypeSchema::array(TypeSchema::number())),
        |input| Ok(input["inner"].clone()),
    );
    let registry = Registry::new(vec![wrap]).expect("registry must build");
    let handle = registry.handle("wrap").expect("registered");

    let inner = registry.shapes().shape(handle).param("inner").expect("declared");
    assert_eq!(inner.producers(), &[handle]);

    let nested = ActionInvocation::new("wrap").with_invocation(
        "inner",
        ActionInvocation::new("wrap").with_literal("inner", json!([1, 2])),
    );
    assert!(registry.check_invocation(&nested).is_empty());
}

#[test]
fn well_formed_chains_have_no_issues() {
    let registry = registry();
    let invocation = ActionInvocation::new("concat")
        .with_invocation("left", ActionInvocation::new("numberToString").with_literal("num", 1))
        .with_literal("right", "!");
    assert!(registry.check_invocation(&invocation).is_empty());
}

#[test]
fn every_shape_problem_in_the_tree_is_reported() {
    let registry = registry();
    let invocation = ActionInvocation::new("concat")
        .with_invocation(
            "left",
            ActionInvocation::new("numberToString").with_literal("num", "one"),
        )
        .with_invocation("right", ActionInvocation::new("stringToNumber").with_literal("text", "2"))
        .with_literal("sep", ",");

    assert_eq!(
        references(&registry, &invocation),
        vec![
            "$.params.left.params.num json_schema.validation",
            "$.params.right chain.shape.incompatible_producer",
            "$.params.sep chain.shape.undeclared_param",
        ]
    );
}

#[test]
fn unknown_and_missing_pieces_are_reported() {
    let registry = registry();

    assert_eq!(
        references(&registry, &ActionInvocation::new("shout")),
        vec!["$.action chain.shape.unknown_action"]
    );

    let invocation = ActionInvocation::new("concat")
        .with_invocation("left", ActionInvocation::new("shout"));
    assert_eq!(
        references(&registry, &invocation),
        vec![
            "$.params.left.action chain.shape.unknown_action",
            "$.params.right chain.shape.missing_param",
        ]
    );
    let issues = registry.check_invocation(&invocation);
    assert!(issues
        .iter()
        .all(|issue| issue.action.as_deref() == Some("concat")));
}
