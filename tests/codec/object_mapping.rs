//! Tier 4: Object Mapping
//!
//! Derived descriptors: creators, renames, defaults, computed properties,
//! enums and cycle detection.

use crate::test_utils::*;
use faunadb::{descriptor, ConfigError, CreatorKind, Encode, Encoder, ObjectDescriptor};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb")]
struct SpellCard {
    name: String,
    element: String,
    cost: i32,
}

// =============================================================================
// Round trips
// =============================================================================

/// Decoding then re-encoding reproduces the object
#[test]
fn test_spell_card_round_trip() {
    let v = wire(r#"{"name": "Fire Beak", "element": "water", "cost": 15}"#);
    let card: SpellCard = decode(&v).unwrap();
    assert_eq!(
        card,
        SpellCard {
            name: "Fire Beak".to_string(),
            element: "water".to_string(),
            cost: 15,
        }
    );

    let back = encode(&card).unwrap();
    let expected: HashSet<&str> = keys(&v).into_iter().collect();
    let actual: HashSet<&str> = keys(&back).into_iter().collect();
    assert_eq!(actual, expected);
    for key in expected {
        assert_eq!(back.as_object().unwrap()[key], v.as_object().unwrap()[key]);
    }
}

#[derive(Debug, Clone, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb")]
struct Blob {
    name: String,
    data: Vec<u8>,
    digest: [u8; 2],
}

/// Byte fields decoded from the bytes tag encode back to it
#[test]
fn test_byte_fields_round_trip() {
    let v = wire(r#"{"name": "x", "data": {"@bytes": "AQID"}, "digest": {"@bytes": "_wA="}}"#);
    let blob: Blob = decode(&v).unwrap();
    assert_eq!(blob.data, vec![1, 2, 3]);
    assert_eq!(blob.digest, [255, 0]);
    assert_eq!(encode(&blob).unwrap(), v);
}

/// Renames, defaults, optional and skipped fields
#[test]
fn test_field_attributes() {
    let v = wire(r#"{"name": "Flood", "element": "water", "cost": 3, "school_name": "Tide"}"#);
    let spell: Spell = decode(&v).unwrap();
    assert_eq!(spell.element, Element::Water);
    assert_eq!(spell.school.as_deref(), Some("Tide"));
    assert_eq!(spell.level, 1);
    assert_eq!(spell.cast_count, 0);

    let out = encode(&spell).unwrap();
    assert_eq!(
        keys(&out),
        vec!["name", "element", "cost", "school_name", "level"]
    );
    assert_eq!(out.as_object().unwrap()["element"], Value::from("water"));
}

/// Absent optional fields become None and encode as Null
#[test]
fn test_optional_field_absent() {
    let v = wire(r#"{"name": "Quake", "element": "Earth", "cost": 9, "level": 4}"#);
    let spell: Spell = decode(&v).unwrap();
    assert_eq!(spell.school, None);
    assert_eq!(spell.level, 4);
    assert_eq!(encode(&spell).unwrap().as_object().unwrap()["school_name"], Value::Null);
}

/// Every bad or missing field is reported at once
#[test]
fn test_decode_failures_aggregate() {
    let v = wire(r#"{"name": 7, "element": "air"}"#);
    let err = decode::<Spell>(&v).unwrap_err();
    let failures = match &err {
        Error::Aggregate { failures } => failures,
        other => panic!("Expected Aggregate, got {:?}", other),
    };
    let at: Vec<&Segment> = failures.iter().map(|(s, _)| s).collect();
    assert_eq!(
        at,
        vec![
            &Segment::Key("name".into()),
            &Segment::Key("element".into()),
            &Segment::Key("cost".into()),
        ]
    );
    assert!(matches!(failures[2].1, Error::KeyNotFound { .. }));
    assert!(err.to_string().contains("no constant named \"air\""), "{}", err);
}

/// Non-object input is a type mismatch
#[test]
fn test_decode_requires_object() {
    assert_eq!(
        decode::<Spell>(&arr([1i64])).unwrap_err(),
        Error::WrongType {
            expected: "Object",
            actual: "Array"
        }
    );
}

// =============================================================================
// Creators
// =============================================================================

/// Factory parameters come first, then remaining write properties
#[test]
fn test_factory_then_setters() {
    let v = wire(r#"{"core": "phoenix", "length": 11.0, "charges": 3, "label": "ignored"}"#);
    let wand: Wand = decode(&v).unwrap();
    assert_eq!(wand, Wand { core: "phoenix".into(), length: 11.0, charges: 3 });

    let d = descriptor::<Wand>().unwrap();
    assert_eq!(d.creator_kind(), CreatorKind::Factory);
    assert_eq!(d.creator_params(), ["core", "length"]);

    let out = encode(&wand).unwrap();
    assert_eq!(keys(&out), vec!["core", "length", "charges", "label"]);
    assert_eq!(out.as_object().unwrap()["label"], Value::from("phoenix (11in)"));
}

/// Write properties are optional when a creator already built the value
#[test]
fn test_factory_without_extra_fields() {
    let wand: Wand = decode(&wire(r#"{"core": "oak", "length": 9.5}"#)).unwrap();
    assert_eq!(wand.charges, 0);
}

/// A bad write property fails after creation succeeds
#[test]
fn test_setter_failure_reported() {
    let err = decode::<Wand>(&wire(r#"{"core": "oak", "length": 9.5, "charges": "many"}"#))
        .unwrap_err();
    match err {
        Error::Aggregate { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, Segment::Key("charges".into()));
        }
        other => panic!("Expected Aggregate, got {:?}", other),
    }
}

/// Default construction fills only the fields present
#[test]
fn test_default_constructor() {
    let settings: Settings = decode(&wire(r#"{"theme": "dark"}"#)).unwrap();
    assert_eq!(settings, Settings { theme: "dark".into(), size: 0 });
    assert_eq!(
        descriptor::<Settings>().unwrap().creator_kind(),
        CreatorKind::DefaultConstructor
    );

    let out = encode(&Settings { theme: "light".into(), size: 14 }).unwrap();
    assert_eq!(out, obj([("theme", Value::from("light")), ("font_size", Value::Long(14))]));
}

// =============================================================================
// Enums
// =============================================================================

/// Renamed constants use their wire names
#[test]
fn test_enum_names() {
    assert_eq!(encode(&Element::Fire).unwrap(), Value::from("fire"));
    assert_eq!(encode(&Element::Earth).unwrap(), Value::from("Earth"));
    assert_eq!(decode::<Element>(&Value::from("water")).unwrap(), Element::Water);
    assert!(decode::<Element>(&Value::from("Water")).is_err());
    assert_eq!(
        decode::<Element>(&Value::Long(1)).unwrap_err(),
        Error::WrongType {
            expected: "String",
            actual: "Long"
        }
    );
}

/// Enums inside containers
#[test]
fn test_enum_collections() {
    let all = vec![Element::Fire, Element::Water, Element::Earth];
    let v = encode(&all).unwrap();
    assert_eq!(v, arr(["fire", "water", "Earth"]));
    assert_eq!(decode::<Vec<Element>>(&v).unwrap(), all);
}

// =============================================================================
// Cycles
// =============================================================================

#[derive(Debug, FaunaObject)]
#[fauna(crate = "faunadb")]
struct Link {
    name: String,
    next: Option<Rc<RefCell<Link>>>,
}

/// A two-node cycle fails instead of recursing forever
#[test]
fn test_cycle_detected() {
    let a = Rc::new(RefCell::new(Link { name: "a".into(), next: None }));
    let b = Rc::new(RefCell::new(Link { name: "b".into(), next: Some(a.clone()) }));
    a.borrow_mut().next = Some(b.clone());

    let err = encode(&a).unwrap_err();
    assert!(matches!(err, Error::SelfReference { .. }), "{:?}", err);
    assert!(err.is_fatal());
    assert!(err.to_string().contains("self reference loop detected"));

    // break the cycle so both nodes drop
    a.borrow_mut().next = None;
}

/// The same node reached twice without a loop is fine
#[test]
fn test_shared_node_is_not_a_cycle() {
    let leaf = Rc::new(RefCell::new(Link { name: "leaf".into(), next: None }));
    let pair = vec![leaf.clone(), leaf];
    let v = encode(&pair).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v.as_array().unwrap()[0], v.as_array().unwrap()[1]);
}

/// Encoder depth returns to zero after a failure
#[test]
fn test_encoder_reusable_after_cycle() {
    let a = Rc::new(RefCell::new(Link { name: "a".into(), next: None }));
    a.borrow_mut().next = Some(a.clone());

    let mut encoder = Encoder::new();
    assert!(a.encode(&mut encoder).is_err());
    assert_eq!(encoder.depth(), 0);

    a.borrow_mut().next = None;
    assert!(a.encode(&mut encoder).is_ok());
}

// =============================================================================
// Configuration errors and caching
// =============================================================================

#[derive(Debug)]
struct Orphan;

impl faunadb::FaunaObject for Orphan {
    fn describe() -> Result<ObjectDescriptor<Self>, ConfigError> {
        ObjectDescriptor::builder().build()
    }
}

/// A type without a creator fails the same way on every call
#[test]
fn test_missing_creator_is_cached_config_error() {
    let value = obj(Vec::<(&str, Value)>::new());
    let first = faunadb::decode_object::<Orphan>(&value).unwrap_err();
    let second = faunadb::decode_object::<Orphan>(&value).unwrap_err();
    assert!(first.is_fatal());
    assert_eq!(first, second);
    assert!(matches!(first, Error::Config(ConfigError::NoCreator { .. })));
}

/// Descriptors are built once and shared across threads
#[test]
fn test_descriptor_shared_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| descriptor::<SpellCard>().unwrap()))
        .collect();
    let descriptors: Vec<Arc<ObjectDescriptor<SpellCard>>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    for d in &descriptors[1..] {
        assert!(Arc::ptr_eq(&descriptors[0], d));
    }
}
