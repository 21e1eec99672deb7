//! End-to-end validation scenarios driven through the public API.

use jsonschema_stream::{Draft, Schema, ValidationResult};
use serde_json::{json, Value};
use test_case::test_case;

fn compile(schema: &Value) -> Schema {
    Schema::compile_with_draft(schema, Some(Draft::Draft6)).expect("Should be a valid schema")
}

fn assert_valid(schema: &Value, instance: &Value) {
    assert_eq!(
        compile(schema).validate(instance),
        ValidationResult::Valid,
        "{} should be valid against {}",
        instance,
        schema
    );
}

fn assert_invalid(schema: &Value, instance: &Value) {
    assert_eq!(
        compile(schema).validate(instance),
        ValidationResult::Invalid,
        "{} should be invalid against {}",
        instance,
        schema
    );
}

#[test_case(&json!(6), ValidationResult::Valid)]
#[test_case(&json!(7), ValidationResult::Invalid; "not a multiple")]
#[test_case(&json!(0), ValidationResult::Invalid; "below minimum")]
#[test_case(&json!(12), ValidationResult::Invalid; "above maximum")]
fn integer_bounds_and_multiple(instance: &Value, expected: ValidationResult) {
    let schema = json!({"type": "integer", "minimum": 1, "maximum": 10, "multipleOf": 3});
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test_case(&json!(["a", "b"]), ValidationResult::Valid)]
#[test_case(&json!(["a", "a"]), ValidationResult::Invalid; "duplicate items")]
#[test_case(&json!(["a", 1]), ValidationResult::Invalid; "wrong item type")]
fn string_array_with_unique_items(instance: &Value, expected: ValidationResult) {
    let schema = json!({"type": "array", "items": {"type": "string"}, "uniqueItems": true});
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test_case(&json!({"n": 1}), ValidationResult::Valid)]
#[test_case(&json!({}), ValidationResult::Invalid; "missing required")]
#[test_case(&json!({"n": 1, "x": 0}), ValidationResult::Invalid; "additional property")]
#[test_case(&json!({"n": "x"}), ValidationResult::Invalid; "wrong property type")]
fn closed_object(instance: &Value, expected: ValidationResult) {
    let schema = json!({
        "type": "object",
        "properties": {"n": {"type": "integer"}},
        "required": ["n"],
        "additionalProperties": false
    });
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test_case(&json!(3), ValidationResult::Valid)]
#[test_case(&json!("hello"), ValidationResult::Valid; "string branch")]
#[test_case(&json!(7), ValidationResult::Invalid; "no branch matches")]
#[test_case(&json!(true), ValidationResult::Invalid; "boolean matches nothing")]
fn any_of_branches(instance: &Value, expected: ValidationResult) {
    let schema = json!({"anyOf": [{"type": "integer", "maximum": 5}, {"type": "string"}]});
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test_case(&json!(3), ValidationResult::Valid)]
#[test_case(&json!(4), ValidationResult::Invalid; "both branches valid")]
#[test_case(&json!("a"), ValidationResult::Invalid; "no branch valid")]
fn one_of_branches(instance: &Value, expected: ValidationResult) {
    let schema = json!({"oneOf": [{"type": "integer"}, {"multipleOf": 2}]});
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test_case(&json!(5), ValidationResult::Valid)]
#[test_case(&json!(0), ValidationResult::Invalid; "below referenced minimum")]
#[test_case(&json!("x"), ValidationResult::Invalid; "wrong type")]
fn reference_to_definitions(instance: &Value, expected: ValidationResult) {
    let schema = json!({
        "definitions": {"pos": {"type": "integer", "minimum": 1}},
        "$ref": "#/definitions/pos"
    });
    assert_eq!(compile(&schema).validate(instance), expected);
}

#[test]
fn minimum_boundary_is_inclusive() {
    assert_valid(&json!({"type": "integer", "minimum": 5}), &json!(5));
}

#[test]
fn draft4_exclusive_minimum_flag() {
    let schema = json!({"type": "integer", "minimum": 5, "exclusiveMinimum": true});
    let compiled = Schema::compile_with_draft(&schema, Some(Draft::Draft4)).unwrap();
    assert_eq!(compiled.validate(&json!(5)), ValidationResult::Invalid);
    assert_eq!(compiled.validate(&json!(6)), ValidationResult::Valid);
}

#[test]
fn draft6_exclusive_bounds_are_limits() {
    let schema = json!({"type": "number", "exclusiveMinimum": 2.5, "exclusiveMaximum": 7});
    let compiled = compile(&schema);
    assert_eq!(compiled.validate(&json!(2.5)), ValidationResult::Invalid);
    assert_eq!(compiled.validate(&json!(3)), ValidationResult::Valid);
    assert_eq!(compiled.validate(&json!(7)), ValidationResult::Invalid);
}

#[test]
fn integral_double_satisfies_integer() {
    let schema = json!({"type": "integer"});
    assert_valid(&schema, &json!(5.0));
    assert_invalid(&schema, &json!(5.5));
}

#[test]
fn unique_items_sees_through_key_order() {
    let schema = json!({"type": "array", "uniqueItems": true});
    assert_invalid(&schema, &json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]));
    assert_valid(&schema, &json!([{"a": 1}, {"a": 2}]));
}

#[test]
fn enum_membership_is_representation_insensitive() {
    let schema = json!({"enum": [1, "two", [3]]});
    assert_valid(&schema, &json!(1.0));
    assert_valid(&schema, &json!("two"));
    assert_valid(&schema, &json!([3]));
    assert_invalid(&schema, &json!(2));
}

#[test]
fn const_requires_deep_equality() {
    let schema = json!({"const": {"a": [1, 2]}});
    assert_valid(&schema, &json!({"a": [1, 2]}));
    assert_invalid(&schema, &json!({"a": [1, 2, 3]}));
}

#[test]
fn all_of_combines_constraints() {
    let schema = json!({"allOf": [
        {"type": "integer", "minimum": 3},
        {"type": "integer", "maximum": 5}
    ]});
    assert_valid(&schema, &json!(4));
    assert_invalid(&schema, &json!(2));
    assert_invalid(&schema, &json!(6));
}

#[test]
fn not_inverts_the_subschema() {
    let schema = json!({"not": {"type": "string"}});
    assert_valid(&schema, &json!(1));
    assert_invalid(&schema, &json!("x"));
}

#[test]
fn type_list_accepts_any_listed_type() {
    let schema = json!({"type": ["integer", "string"], "minimum": 3, "minLength": 2});
    assert_valid(&schema, &json!(5));
    assert_valid(&schema, &json!("ab"));
    assert_invalid(&schema, &json!(1));
    assert_invalid(&schema, &json!("a"));
    assert_invalid(&schema, &json!(true));
}

#[test]
fn items_list_with_additional_items() {
    let schema = json!({
        "type": "array",
        "items": [{"type": "integer"}, {"type": "string"}],
        "additionalItems": {"type": "boolean"}
    });
    assert_valid(&schema, &json!([1, "a", true, false]));
    assert_invalid(&schema, &json!([1, "a", 3]));
    assert_invalid(&schema, &json!(["a"]));
}

#[test]
fn additional_items_false_caps_the_array() {
    let schema = json!({
        "type": "array",
        "items": [{"type": "integer"}],
        "additionalItems": false
    });
    assert_valid(&schema, &json!([]));
    assert_valid(&schema, &json!([1]));
    assert_invalid(&schema, &json!([1, 2]));
}

#[test]
fn min_and_max_items() {
    let schema = json!({"type": "array", "minItems": 1, "maxItems": 2});
    assert_invalid(&schema, &json!([]));
    assert_valid(&schema, &json!([1]));
    assert_valid(&schema, &json!([1, 2]));
    assert_invalid(&schema, &json!([1, 2, 3]));
}

#[test]
fn contains_needs_one_matching_item() {
    let schema = json!({"type": "array", "contains": {"type": "integer", "minimum": 5}});
    assert_valid(&schema, &json!([1, "x", 7]));
    assert_invalid(&schema, &json!([1, 2]));
    assert_invalid(&schema, &json!([]));
}

#[test]
fn pattern_properties_select_by_regex() {
    let schema = json!({
        "type": "object",
        "patternProperties": {"^num_": {"type": "integer"}},
        "additionalProperties": false
    });
    assert_valid(&schema, &json!({"num_a": 1, "num_b": 2}));
    assert_invalid(&schema, &json!({"num_a": "x"}));
    assert_invalid(&schema, &json!({"other": 1}));
}

#[test]
fn property_names_constrain_keys() {
    let schema = json!({
        "type": "object",
        "propertyNames": {"type": "string", "maxLength": 3}
    });
    assert_valid(&schema, &json!({"ab": 1, "abc": 2}));
    assert_invalid(&schema, &json!({"abcd": 1}));
}

#[test]
fn key_array_dependencies() {
    let schema = json!({
        "type": "object",
        "dependencies": {"a": ["b"]}
    });
    assert_valid(&schema, &json!({"a": 1, "b": 2}));
    assert_valid(&schema, &json!({"c": 1}));
    assert_invalid(&schema, &json!({"a": 1}));
}

#[test]
fn schema_dependencies() {
    let schema = json!({
        "type": "object",
        "dependencies": {"a": {"type": "object", "required": ["b"]}}
    });
    assert_valid(&schema, &json!({"a": 1, "b": 2}));
    assert_valid(&schema, &json!({"c": 1}));
    assert_invalid(&schema, &json!({"a": 1}));
}

#[test]
fn min_and_max_properties() {
    let schema = json!({"type": "object", "minProperties": 1, "maxProperties": 2});
    assert_invalid(&schema, &json!({}));
    assert_valid(&schema, &json!({"a": 1}));
    assert_valid(&schema, &json!({"a": 1, "b": 2}));
    assert_invalid(&schema, &json!({"a": 1, "b": 2, "c": 3}));
}

#[test]
fn string_length_counts_characters() {
    let schema = json!({"type": "string", "minLength": 2, "maxLength": 3});
    assert_invalid(&schema, &json!("a"));
    assert_valid(&schema, &json!("ab"));
    // three characters even though more bytes
    assert_valid(&schema, &json!("äöü"));
    assert_invalid(&schema, &json!("abcd"));
}

#[test]
fn pattern_matches_anywhere() {
    let schema = json!({"type": "string", "pattern": "b.t"});
    assert_valid(&schema, &json!("about a bat"));
    assert_invalid(&schema, &json!("dog"));
}

#[test]
fn boolean_subschemas_in_draft6() {
    assert_valid(&json!({"items": true}), &json!([1, "a"]));
    assert_invalid(&json!({"items": false}), &json!([1]));
    assert_valid(&json!({"items": false}), &json!([]));
    assert_valid(&json!({"not": false}), &json!(1));
    assert_invalid(&json!({"not": true}), &json!(1));
}

#[test]
fn nested_objects_validate_member_by_member() {
    let schema = json!({
        "type": "object",
        "properties": {
            "inner": {
                "type": "object",
                "properties": {"q": {"type": "integer", "minimum": 10}},
                "required": ["q"]
            }
        },
        "required": ["inner"]
    });
    assert_valid(&schema, &json!({"inner": {"q": 10}}));
    assert_invalid(&schema, &json!({"inner": {"q": 9}}));
    assert_invalid(&schema, &json!({"inner": {}}));
    assert_invalid(&schema, &json!({"inner": 3}));
}

#[test]
fn chained_references_resolve() {
    let schema = json!({
        "definitions": {
            "a": {"type": "integer", "minimum": 1},
            "b": {"$ref": "#/definitions/a"}
        },
        "$ref": "#/definitions/b"
    });
    assert_valid(&schema, &json!(5));
    assert_invalid(&schema, &json!(0));
    assert_invalid(&schema, &json!("x"));
}

#[test]
fn recursive_schema_via_reference() {
    let schema = json!({
        "type": "object",
        "properties": {
            "value": {"type": "integer"},
            "next": {"$ref": "#"}
        },
        "required": ["value"]
    });
    assert_valid(&schema, &json!({"value": 1, "next": {"value": 2}}));
    assert_invalid(&schema, &json!({"value": 1, "next": {}}));
}

#[test]
fn mixed_schema_constrains_matching_types_only() {
    // no `type`: numeric branches carry the bound, other kinds have no probe
    let schema = json!({"minimum": 3});
    assert_valid(&schema, &json!(4));
    assert_invalid(&schema, &json!(2));
}

#[test]
fn boolean_root_schemas() {
    assert_valid(&json!(true), &json!({"a": 1}));
    assert_valid(&json!(true), &json!(3));
    assert_invalid(&json!(false), &json!(3));
    assert_invalid(&json!(false), &json!([1, 2]));
}

#[test]
fn empty_schema_accepts_everything() {
    let schema = json!({});
    for instance in [
        json!(null),
        json!(true),
        json!(1),
        json!(2.5),
        json!("x"),
        json!([1, 2]),
        json!({"a": 1}),
    ]
    .iter()
    {
        assert_valid(&schema, instance);
    }
}
