//! Tier 3: Fields
//!
//! Typed extraction from response trees.

use crate::test_utils::*;
use std::collections::HashSet;

fn page() -> Value {
    wire(
        r#"{
            "data": [
                {"ref": {"@ref": {"id": "1", "class": {"@ref": {"id": "spells", "class": {"@ref": {"id": "classes"}}}}}},
                 "data": {"name": "Fire Beak", "cost": 15}},
                {"ref": {"@ref": {"id": "2", "class": {"@ref": {"id": "spells", "class": {"@ref": {"id": "classes"}}}}}},
                 "data": {"name": "Water Dart", "cost": "cheap"}}
            ],
            "after": null
        }"#,
    )
}

// =============================================================================
// Navigation
// =============================================================================

/// A missing key is a returned failure that names the key
#[test]
fn test_missing_key_reported() {
    let err = Field::at_keys(["missing"]).get(&obj(Vec::<(&str, Value)>::new())).unwrap_err();
    assert!(err.is_path_error());
    assert!(err.to_string().contains("missing"), "{}", err);
}

/// Navigation stops at the first missing segment
#[test]
fn test_short_circuit_on_first_miss() {
    let err = Field::at_keys(["data", "x", "y"]).get(&page()).unwrap_err();
    assert!(matches!(err, Error::NotAContainer { .. }), "{:?}", err);

    let err = Field::at_path("data[5].ref".parse().unwrap()).get(&page()).unwrap_err();
    match err {
        Error::IndexNotFound { path, index } => {
            assert_eq!(path.to_string(), "data");
            assert_eq!(index, 5);
        }
        other => panic!("Expected IndexNotFound, got {:?}", other),
    }
}

/// Fields compose by concatenating paths
#[test]
fn test_compose_and_convert() {
    let first = Field::at_keys(["data"]).at(&Field::at_indexes([0]));
    let name = first
        .at(&Field::at_keys(["data", "name"]))
        .to::<String>();
    assert_eq!(name.path().to_string(), "data[0].data.name");
    assert_eq!(name.get(&page()).unwrap(), "Fire Beak");

    let class = first.at(&Field::at_keys(["ref"])).to::<Ref>();
    let r = class.get(&page()).unwrap();
    assert_eq!(r.class_ref(), Some(&Ref::class("spells")));
}

/// Optional fields treat absence and null alike
#[test]
fn test_get_optional() {
    let after = Field::at_keys(["after"]).to::<String>();
    assert_eq!(after.get_optional(&page()).unwrap(), None);
    let before = Field::at_keys(["before"]).to::<String>();
    assert_eq!(before.get_optional(&page()).unwrap(), None);
}

/// Identity is the path alone
#[test]
fn test_field_identity_by_path() {
    let a = Field::at_keys(["data", "name"]).to::<String>();
    let b = Field::at_path("data.name".parse().unwrap()).to::<String>();
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

// =============================================================================
// Collect
// =============================================================================

/// Collect yields every element in order
#[test]
fn test_collect_success() {
    let names = Field::at_keys(["data"])
        .collect(&Field::at_keys(["data", "name"]).to::<String>())
        .get(&page())
        .unwrap();
    assert_eq!(names, vec!["Fire Beak", "Water Dart"]);
}

/// Collect reports the index of each bad element in one failure
#[test]
fn test_collect_aggregates() {
    let err = Field::at_keys(["data"])
        .collect(&Field::at_keys(["data", "cost"]).to::<i64>())
        .get(&page())
        .unwrap_err();
    match &err {
        Error::Aggregate { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, Segment::Index(1));
        }
        other => panic!("Expected Aggregate, got {:?}", other),
    }
    assert!(err.to_string().contains("index 1"), "{}", err);
}

/// Collect over a flat array of longs
#[test]
fn test_collect_longs() {
    let longs = Field::root().collect(&Field::root().to::<i64>());
    assert_eq!(longs.get(&arr([1i64, 2, 3])).unwrap(), vec![1, 2, 3]);

    let bad = arr([Value::from("1"), Value::Long(2), Value::Long(3)]);
    let err = longs.get(&bad).unwrap_err();
    assert!(err.to_string().contains("index 0"), "{}", err);
}

/// Collect requires an array
#[test]
fn test_collect_requires_array() {
    let err = Field::at_keys(["after"])
        .collect(&Field::root().to::<i64>())
        .get(&page())
        .unwrap_err();
    assert_eq!(
        err,
        Error::WrongType {
            expected: "Array",
            actual: "Null"
        }
    );
}
