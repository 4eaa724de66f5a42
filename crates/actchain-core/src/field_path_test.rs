use super::{FieldPath, FieldPathSegment};

#[test]
fn root_renders_as_dollar() {
    let path = FieldPath::root();
    assert!(path.is_root());
    assert_eq!(path.to_string(), "$");
}

#[test]
fn param_paths_nest_under_params_key() {
    let path = FieldPath::root().param("text").param("num");
    assert_eq!(path.to_string(), "$.params.text.params.num");
}

#[test]
fn json_pointer_decodes_escapes_and_indexes() {
    let path = FieldPath::from_json_pointer("/items/2/a~1b/c~0d");
    assert_eq!(
        path.segments(),
        &[
            FieldPathSegment::Key("items".to_string()),
            FieldPathSegment::Index(2),
            FieldPathSegment::Key("a/b".to_string()),
            FieldPathSegment::Key("c~d".to_string()),
        ]
    );
    assert_eq!(path.to_string(), "$.items[2].a/b.c~d");
}

#[test]
fn empty_pointer_is_root() {
    assert!(FieldPath::from_json_pointer("").is_root());
    assert!(FieldPath::from_json_pointer("/").is_root());
}

#[test]
fn joined_appends_suffix_segments() {
    let node = FieldPath::root().param("point");
    let joined = node.joined(&FieldPath::from_json_pointer("/x"));
    assert_eq!(joined.to_string(), "$.params.point.x");
}
