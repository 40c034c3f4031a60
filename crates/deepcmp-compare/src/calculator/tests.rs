use std::cmp::Ordering;
use std::sync::Arc;

use deepcmp_types::{Object, StandardRepresentation, TypeInfo, Value};
use proptest::prelude::*;
use serde_json::{json, Value as Json};

use super::*;
use crate::comparator::ComparatorError;
use crate::error::CompareError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn differences(actual: &Value, expected: &Value, config: &RecursiveComparisonConfig) -> Vec<ComparisonDifference> {
    determine_differences(actual, expected, config).unwrap()
}

fn default_differences(actual: &Value, expected: &Value) -> Vec<ComparisonDifference> {
    differences(actual, expected, &RecursiveComparisonConfig::default())
}

fn paths(differences: &[ComparisonDifference]) -> Vec<&str> {
    differences.iter().map(ComparisonDifference::path).collect()
}

fn person(person_type: &Arc<TypeInfo>, name: &str, age: i64) -> Object {
    Object::new(person_type).with("name", name).with("age", age)
}

/// Two people pointing at each other through `neighbour`.
fn neighbours(first_age: i64, second_name: &str) -> Value {
    let person_type = TypeInfo::new("Person");
    let jack = person(&person_type, "Jack", first_age);
    let tim = person(&person_type, second_name, 20).with("neighbour", &jack);
    jack.set("neighbour", &tim);
    Value::from(jack)
}

fn json_documents() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::from),
        any::<i64>().prop_map(Json::from),
        "[a-z]{0,8}".prop_map(Json::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|members| Json::Object(members.into_iter().collect())),
        ]
    })
}

// ---------------------------------------------------------------------------
// Reflexivity and termination
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn separately_built_equal_graphs_have_no_differences(document in json_documents()) {
        let actual = Value::from(document.clone());
        let expected = Value::from(document);
        prop_assert!(default_differences(&actual, &expected).is_empty());
    }

    #[test]
    fn a_value_compared_with_itself_has_no_differences(document in json_documents()) {
        let value = Value::from(document);
        let mut config = RecursiveComparisonConfig::default();
        config.ignore_collection_order(true);
        prop_assert!(differences(&value, &value, &config).is_empty());
    }
}

#[test]
fn equal_cycles_terminate_without_differences() {
    assert!(default_differences(&neighbours(10, "Tim"), &neighbours(10, "Tim")).is_empty());
}

#[test]
fn different_cycles_terminate_with_bounded_differences() {
    let found = default_differences(&neighbours(10, "Tim"), &neighbours(10, "Tom"));
    assert_eq!(paths(&found), vec!["neighbour.name"]);
}

#[test]
fn a_difference_reached_twice_is_reported_once() {
    let found = default_differences(&neighbours(10, "Tim"), &neighbours(11, "Tim"));
    assert_eq!(paths(&found), vec!["age"]);
    assert!(found[0].actual().equals(&Value::from(10)));
    assert!(found[0].expected().equals(&Value::from(11)));
}

#[test]
fn shared_instances_replay_recorded_differences() {
    let item_type = TypeInfo::new("Item");
    let pair_type = TypeInfo::new("Pair");
    let actual_item = Object::new(&item_type).with("id", 1);
    let expected_item = Object::new(&item_type).with("id", 2);
    let actual = Object::new(&pair_type)
        .with("left", &actual_item)
        .with("right", &actual_item);
    let expected = Object::new(&pair_type)
        .with("left", &expected_item)
        .with("right", &expected_item);

    let found = default_differences(&Value::from(actual), &Value::from(expected));
    assert_eq!(paths(&found), vec!["left", "right.id"]);
    assert_eq!(found[0].description(), Some("already visited node but now location is: <left>"));
}

// ---------------------------------------------------------------------------
// Objects and fields
// ---------------------------------------------------------------------------

#[test]
fn compare_only_fields_restricts_the_walk() {
    let name_type = TypeInfo::new("Name");
    let person_type = TypeInfo::new("Person");
    let actual = Object::new(&person_type)
        .with("name", Object::new(&name_type).with("first", "Jack").with("last", "Doe"))
        .with("age", 10);
    let expected = Object::new(&person_type)
        .with("name", Object::new(&name_type).with("first", "John").with("last", "Doe"))
        .with("age", 11);

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["name"]);
    let found = differences(&Value::from(actual), &Value::from(expected), &config);
    assert_eq!(paths(&found), vec!["name.first"]);
}

#[test]
fn unknown_compared_fields_are_an_error() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(person(&person_type, "Jack", 10));
    let expected = Value::from(person(&person_type, "Jack", 10));
    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["height"]);

    let err = determine_differences(&actual, &expected, &config).unwrap_err();
    assert_eq!(err, CompareError::UnknownComparedFields("{height}".to_string()));
}

#[test]
fn ignored_fields_are_skipped() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(person(&person_type, "Jack", 10));
    let expected = Value::from(person(&person_type, "Jack", 11));
    let mut config = RecursiveComparisonConfig::default();
    config.ignore_fields(["age"]);
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn strict_type_checking_reports_incompatible_roots_once() {
    let dog = Value::from(person(&TypeInfo::new("Dog"), "Rex", 3));
    let cat = Value::from(person(&TypeInfo::new("Cat"), "Rex", 3));

    let mut config = RecursiveComparisonConfig::default();
    config.strict_type_checking(true);
    let found = differences(&dog, &cat, &config);
    assert_eq!(paths(&found), vec![""]);
    assert!(found[0].description().unwrap().contains("strict type checking"));

    assert!(default_differences(&dog, &cat).is_empty());
    let older_cat = Value::from(person(&TypeInfo::new("Cat"), "Rex", 4));
    assert_eq!(paths(&default_differences(&dog, &older_cat)), vec!["age"]);
}

#[test]
fn strict_type_checking_accepts_an_expected_subtype() {
    let animal = TypeInfo::new("Animal");
    let dog = TypeInfo::builder("Dog").extends(&animal).build();
    let mut config = RecursiveComparisonConfig::default();
    config.strict_type_checking(true);

    let actual = Value::from(person(&animal, "Rex", 3));
    let expected = Value::from(person(&dog, "Rex", 3));
    assert!(differences(&actual, &expected, &config).is_empty());
    assert_eq!(differences(&expected, &actual, &config).len(), 1);
}

#[test]
fn missing_and_extra_fields_are_reported_on_the_parent() {
    let actual = Value::from(json!({"a": 1}));
    let expected = Value::from(json!({"a": 1, "b": 2}));
    let found = default_differences(&actual, &expected);
    assert_eq!(paths(&found), vec![""]);
    assert_eq!(
        found[0].description(),
        Some("actual value had less fields to compare than expected value, it did not have these fields: [b]")
    );

    let actual = Value::from(json!({"a": 1, "c": 3}));
    let found = default_differences(&actual, &expected);
    let description = found[0].description().unwrap();
    assert!(description.starts_with("actual value and expected value fields to compare differ:"));
    assert!(description.contains("it did not have these fields: [b]"));
    assert!(description.contains("could not be found in expected: [c]"));
}

#[test]
fn compare_only_fields_ignore_expected_extra_fields() {
    let actual = Value::from(json!({"a": 1, "c": 3}));
    let expected = Value::from(json!({"a": 1, "b": 2}));

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["a"]);
    assert!(differences(&actual, &expected, &config).is_empty());

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["c"]);
    let found = differences(&actual, &expected, &config);
    assert_eq!(
        found[0].description(),
        Some("actual value had more fields to compare than expected value, these actual fields could not be found in expected: [c]")
    );
}

#[test]
fn overridden_equals_is_used_only_when_configured() {
    let money = TypeInfo::builder("Money").equals(|_, _| true).build();
    let order = TypeInfo::new("Order");
    let actual = Value::from(Object::new(&order).with("price", Object::new(&money).with("amount", 1)));
    let expected = Value::from(Object::new(&order).with("price", Object::new(&money).with("amount", 2)));

    assert_eq!(paths(&default_differences(&actual, &expected)), vec!["price.amount"]);

    let mut config = RecursiveComparisonConfig::default();
    config.use_overridden_equals();
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn compared_types_keep_only_their_differences() {
    let name_type = TypeInfo::new("Name");
    let person_type = TypeInfo::new("Person");
    let actual = Object::new(&person_type)
        .with("name", Object::new(&name_type).with("first", "Jack").with("last", "Doe"))
        .with("age", 10);
    let expected = Object::new(&person_type)
        .with("name", Object::new(&name_type).with("first", "John").with("last", "Doe"))
        .with("age", 11);

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields_of_types(["Name"]);
    let found = differences(&Value::from(actual), &Value::from(expected), &config);
    assert_eq!(paths(&found), vec!["name.first"]);
}

#[test]
fn compared_types_honor_ignored_fields() {
    init_tracing();
    let name_type = TypeInfo::new("Name");
    let person_type = TypeInfo::new("Person");
    let someone = |last: &str| {
        Value::from(
            Object::new(&person_type)
                .with("name", Object::new(&name_type).with("first", "Jack").with("last", last))
                .with("age", 10),
        )
    };

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields_of_types(["Name"]).ignore_fields(["name.last"]);
    assert!(differences(&someone("Doe"), &someone("Doe"), &config).is_empty());
    assert!(differences(&someone("Doe"), &someone("Smith"), &config).is_empty());
}

#[test]
fn compared_types_match_on_the_expected_side_too() {
    let name_type = TypeInfo::new("Name");
    let nickname_type = TypeInfo::new("Nickname");
    let person_type = TypeInfo::new("Person");
    let actual = Object::new(&person_type)
        .with("name", Object::new(&nickname_type).with("first", "Jack"))
        .with("age", 10);
    let expected = Object::new(&person_type)
        .with("name", Object::new(&name_type).with("first", "John"))
        .with("age", 11);

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields_of_types(["Name"]);
    let found = differences(&Value::from(actual), &Value::from(expected), &config);
    assert_eq!(paths(&found), vec!["name.first"]);
}

#[test]
fn compared_fields_through_collections_must_exist() {
    let person_type = TypeInfo::new("Person");
    let group_type = TypeInfo::new("Group");
    let group = |name: &str, age: i64| {
        Value::from(Object::new(&group_type).with(
            "friends",
            Value::list(vec![Value::from(person(&person_type, name, age))]),
        ))
    };

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["friends.nmae"]);
    let err = determine_differences(&group("Jack", 10), &group("Jack", 10), &config).unwrap_err();
    assert_eq!(
        err,
        CompareError::UnknownComparedFields("{nmae in <friends.nmae>}".to_string())
    );

    let mut config = RecursiveComparisonConfig::default();
    config.compare_only_fields(["friends.name"]);
    assert!(differences(&group("Jack", 10), &group("Jack", 11), &config).is_empty());
    let found = differences(&group("Jack", 10), &group("Jim", 11), &config);
    assert_eq!(paths(&found), vec!["friends[0].name"]);
}

#[test]
fn null_and_empty_iterables_can_be_equal() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(Object::new(&person_type).with("friends", Value::Null));
    let expected = Value::from(Object::new(&person_type).with("friends", Value::list([])));

    assert_eq!(paths(&default_differences(&actual, &expected)), vec!["friends"]);

    let mut config = RecursiveComparisonConfig::default();
    config.treat_null_and_empty_iterables_as_equal(true);
    assert!(differences(&actual, &expected, &config).is_empty());
}

// ---------------------------------------------------------------------------
// Custom comparators and messages
// ---------------------------------------------------------------------------

#[test]
fn failing_comparator_counts_as_a_difference() {
    init_tracing();
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(Object::new(&person_type).with("age", "ten"));
    let expected = Value::from(Object::new(&person_type).with("age", 10));

    let ints_only = Comparator::new("ints only", |actual, expected| match (actual, expected) {
        (Value::Int(a), Value::Int(e)) => Ok(a.cmp(e)),
        _ => Err(ComparatorError::incompatible(actual, expected)),
    });
    let mut config = RecursiveComparisonConfig::default();
    config.register_comparator_for_fields(ints_only, ["age"]);
    assert_eq!(paths(&differences(&actual, &expected, &config)), vec!["age"]);
}

#[test]
fn type_comparator_settles_values() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(person(&person_type, "JACK", 10));
    let expected = Value::from(person(&person_type, "jack", 10));

    let mut config = RecursiveComparisonConfig::default();
    config.register_comparator_for_type(
        Comparator::new("case insensitive", |a, e| match (a.as_str(), e.as_str()) {
            (Some(a), Some(e)) => Ok(a.to_lowercase().cmp(&e.to_lowercase())),
            _ => Ok(Ordering::Less),
        }),
        "String",
    );
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn field_messages_replace_the_default_template() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::from(person(&person_type, "Jack", 10));
    let expected = Value::from(person(&person_type, "Jack", 11));

    let mut config = RecursiveComparisonConfig::default();
    config.register_error_message_for_fields(Some("the age is wrong"), ["age"]);
    let found = differences(&actual, &expected, &config);
    let representation = StandardRepresentation::default();
    assert_eq!(found[0].multi_line_description(&representation), "the age is wrong");
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[test]
fn enums_and_strings() {
    let red = Value::enum_constant("Color", "RED");
    let found = default_differences(&red, &Value::from("RED"));
    assert_eq!(
        found[0].description(),
        Some("expected field is a String but actual field is an enum")
    );

    let mut config = RecursiveComparisonConfig::default();
    config.allow_comparing_enum_against_string(true);
    assert!(differences(&red, &Value::from("RED"), &config).is_empty());
    assert!(differences(&Value::from("RED"), &red, &config).is_empty());
    assert_eq!(differences(&red, &Value::from("red"), &config).len(), 1);
}

#[test]
fn enums_compare_by_name_unless_strict() {
    let color = Value::enum_constant("Color", "RED");
    let paint = Value::enum_constant("Paint", "RED");
    assert!(default_differences(&color, &paint).is_empty());
    assert_eq!(
        default_differences(&color, &Value::enum_constant("Color", "BLUE")).len(),
        1
    );

    let mut config = RecursiveComparisonConfig::default();
    config.strict_type_checking(true);
    assert_eq!(differences(&color, &paint, &config).len(), 1);
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

#[test]
fn collection_order_is_significant_unless_ignored() {
    let actual = Value::list([Value::from(1), Value::from(2), Value::from(3)]);
    let expected = Value::list([Value::from(3), Value::from(2), Value::from(1)]);
    assert_eq!(paths(&default_differences(&actual, &expected)), vec!["[0]", "[2]"]);

    let mut config = RecursiveComparisonConfig::default();
    config.ignore_collection_order(true);
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn unordered_elements_are_matched_once() {
    let actual = Value::hash_set([Value::from(1), Value::from(2)]);
    let expected = Value::hash_set([Value::from(1), Value::from(3)]);
    let found = default_differences(&actual, &expected);
    assert_eq!(
        found[0].description(),
        Some("The following expected elements were not matched in the actual HashSet:\n  [3]")
    );

    let actual = Value::list([Value::from(1), Value::from(1), Value::from(2)]);
    let expected = Value::list([Value::from(1), Value::from(2), Value::from(2)]);
    let mut config = RecursiveComparisonConfig::default();
    config.ignore_collection_order(true);
    assert_eq!(differences(&actual, &expected, &config).len(), 1);
}

#[test]
fn unordered_objects_match_despite_ignored_fields() {
    let person_type = TypeInfo::new("Person");
    let actual = Value::list([
        Value::from(person(&person_type, "Jack", 1)),
        Value::from(person(&person_type, "Tim", 2)),
    ]);
    let expected = Value::list([
        Value::from(person(&person_type, "Tim", 20)),
        Value::from(person(&person_type, "Jack", 10)),
    ]);
    let mut config = RecursiveComparisonConfig::default();
    config.ignore_collection_order(true).ignore_fields(["age"]);
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn arrays_of_different_size() {
    let actual = Value::array([Value::from(1)]);
    let expected = Value::array([Value::from(1), Value::from(2)]);
    let found = default_differences(&actual, &expected);
    assert_eq!(
        found[0].description(),
        Some("actual and expected values are arrays of different size, actual size=1 when expected size=2")
    );
}

#[test]
fn map_keys_missing_from_actual() {
    let actual = Value::map([(Value::from("a"), Value::from(1))]);
    let expected = Value::map([
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let found = default_differences(&actual, &expected);
    assert_eq!(found.len(), 1);
    let description = found[0].description().unwrap();
    assert!(description.contains("The following keys were not found in the actual map value:\n  [\"b\"]"));

    let mut config = RecursiveComparisonConfig::default();
    config.ignore_fields(["b"]);
    assert!(differences(&actual, &expected, &config).is_empty());
}

#[test]
fn map_values_are_compared_by_key() {
    let actual = Value::map([
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let expected = Value::map([
        (Value::from("b"), Value::from(3)),
        (Value::from("a"), Value::from(1)),
    ]);
    assert_eq!(paths(&default_differences(&actual, &expected)), vec!["b"]);
}

#[test]
fn sorted_maps_report_key_differences() {
    let actual = Value::sorted_map([
        (Value::from("a"), Value::from(1)),
        (Value::from("b"), Value::from(2)),
    ]);
    let expected = Value::sorted_map([
        (Value::from("a"), Value::from(1)),
        (Value::from("c"), Value::from(2)),
    ]);
    let found = default_differences(&actual, &expected);
    assert_eq!(found.len(), 1);
    assert!(found[0].is_key_difference());

    let hash_map = Value::map([(Value::from("a"), Value::from(1))]);
    let sorted = Value::sorted_map([(Value::from("a"), Value::from(1))]);
    let found = default_differences(&hash_map, &sorted);
    assert_eq!(
        found[0].description(),
        Some("expected field is a sorted map but actual field is not (HashMap)")
    );
}

#[test]
fn optionals_compare_their_content() {
    let some_one = Value::optional(Some(Value::from(1)));
    let some_two = Value::optional(Some(Value::from(2)));
    assert_eq!(paths(&default_differences(&some_one, &some_two)), vec!["value"]);
    assert_eq!(paths(&default_differences(&some_one, &Value::empty_optional())), vec![""]);
    assert!(default_differences(&Value::empty_optional(), &Value::empty_optional()).is_empty());
}

#[test]
fn atomics_compare_their_content() {
    assert_eq!(
        paths(&default_differences(&Value::atomic_int(1), &Value::atomic_int(2))),
        vec!["value"]
    );
    assert!(default_differences(&Value::atomic_long(7), &Value::atomic_long(7)).is_empty());
    assert_eq!(
        paths(&default_differences(
            &Value::atomic_int_array([1, 2]),
            &Value::atomic_int_array([1, 3])
        )),
        vec!["array[1]"]
    );
}

// ---------------------------------------------------------------------------
// Ordering and sharing
// ---------------------------------------------------------------------------

#[test]
fn differences_come_out_sorted_and_stable() {
    let actual = Value::from(json!({"b": {"c": 1, "a": 1}, "a": 1, "aa": 1}));
    let expected = Value::from(json!({"b": {"c": 2, "a": 2}, "a": 2, "aa": 2}));

    let first = default_differences(&actual, &expected);
    assert_eq!(paths(&first), vec!["a", "aa", "b.a", "b.c"]);
    let second = default_differences(&actual, &expected);
    assert_eq!(paths(&first), paths(&second));
}

#[test]
fn one_configuration_serves_many_threads() {
    let mut config = RecursiveComparisonConfig::default();
    config.ignore_collection_order(true);
    let config = &config;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                scope.spawn(move || {
                    let actual = Value::from(json!({"id": i, "tags": ["x", "y"]}));
                    let expected = Value::from(json!({"id": i + 1, "tags": ["y", "x"]}));
                    DifferenceCalculator::new(config)
                        .determine_differences(&actual, &expected)
                        .map(|found| paths(&found).join(","))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "id");
        }
    });
}
