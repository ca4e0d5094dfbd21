//! Tier 2: Scalars
//!
//! Numeric narrowing is two's-complement truncation of the 64-bit wire
//! integer; doubles narrow with a plain cast.

use crate::test_utils::*;
use chrono::{DateTime, Utc};
use faunadb::Bytes;
use std::collections::{BTreeMap, HashSet};

// =============================================================================
// Numeric narrowing
// =============================================================================

/// Small values survive an encode/decode cycle through every width
#[test]
fn test_small_integer_round_trip() {
    let v = encode(&5i64).unwrap();
    assert_eq!(decode::<i8>(&v).unwrap(), 5);
    assert_eq!(decode::<i16>(&v).unwrap(), 5);
    assert_eq!(decode::<i32>(&v).unwrap(), 5);
    assert_eq!(decode::<u8>(&v).unwrap(), 5);
}

/// Out-of-range values truncate bit-for-bit
#[test]
fn test_narrowing_truncates() {
    assert_eq!(decode::<i8>(&encode(&300i64).unwrap()).unwrap(), 44);
    assert_eq!(decode::<i8>(&Value::Long(-129)).unwrap(), 127);
    assert_eq!(decode::<u8>(&Value::Long(-1)).unwrap(), 255);
    assert_eq!(decode::<i16>(&Value::Long(65_537)).unwrap(), 1);
    assert_eq!(decode::<i32>(&Value::Long(1 << 32)).unwrap(), 0);
}

/// Unsigned values past the wire range refuse to encode
#[test]
fn test_u64_overflow_rejected() {
    assert_eq!(encode(&(i64::MAX as u64)).unwrap(), Value::Long(i64::MAX));
    let err = encode(&u64::MAX).unwrap_err();
    assert!(err.to_string().contains("64-bit"), "{}", err);
}

/// Float narrowing is a plain cast
#[test]
fn test_float_narrowing() {
    let f: f32 = decode(&Value::Double(0.1)).unwrap();
    assert_eq!(f, 0.1f64 as f32);
    assert_eq!(encode(&1.5f32).unwrap(), Value::Double(1.5));
}

/// Type mismatches name both variants
#[test]
fn test_wrong_type_message() {
    let err = decode::<i64>(&Value::from("1")).unwrap_err();
    assert_eq!(
        err,
        Error::WrongType {
            expected: "Long",
            actual: "String"
        }
    );
    assert_eq!(err.to_string(), "expected Long but found String");
}

// =============================================================================
// Time and binary
// =============================================================================

/// Nanoseconds survive decoding into chrono
#[test]
fn test_timestamp_to_chrono_is_lossless() {
    let v = wire(r#"{"@ts": "2015-01-15T13:56:51.123456789Z"}"#);
    let dt: DateTime<Utc> = decode(&v).unwrap();
    assert_eq!(dt.timestamp_subsec_nanos(), 123_456_789);
    assert_eq!(encode(&dt).unwrap(), v);
}

/// Dates decode only from the date tag
#[test]
fn test_date_decoding() {
    let d: NaiveDate = decode(&wire(r#"{"@date": "2024-02-29"}"#)).unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert!(decode::<NaiveDate>(&Value::from("2024-02-29")).is_err());
}

/// Byte sequences encode to the Bytes variant, other integer vectors to arrays
#[test]
fn test_bytes_versus_vectors() {
    let raw = vec![1u8, 2, 3];
    assert_eq!(encode(&Bytes(raw.clone())).unwrap(), Value::Bytes(raw.clone()));
    assert_eq!(encode(&raw).unwrap(), Value::Bytes(raw.clone()));
    assert_eq!(encode(raw.as_slice()).unwrap(), Value::Bytes(raw.clone()));
    assert_eq!(encode(&[1u8, 2, 3]).unwrap(), Value::Bytes(raw.clone()));
    assert_eq!(encode(&Vec::<u8>::new()).unwrap(), Value::Bytes(Vec::new()));
    assert_eq!(
        encode(&vec![1i64, 2, 3]).unwrap(),
        Value::Array(vec![Value::Long(1), Value::Long(2), Value::Long(3)])
    );

    let from_tag: Vec<u8> = decode(&wire(r#"{"@bytes": "AQID"}"#)).unwrap();
    assert_eq!(from_tag, raw);
    let from_array: Vec<u8> = decode(&arr([1i64, 2, 3])).unwrap();
    assert_eq!(from_array, raw);
    let back: Bytes = decode(&Value::Bytes(raw.clone())).unwrap();
    assert_eq!(back.into_inner(), raw);
    assert!(decode::<Bytes>(&arr([1i64, 2, 3])).is_err());
}

/// Nested byte vectors stay binary inside arrays and options
#[test]
fn test_nested_bytes() {
    let chunks = vec![vec![0u8, 255], vec![7u8]];
    assert_eq!(
        encode(&chunks).unwrap(),
        arr([Value::Bytes(vec![0, 255]), Value::Bytes(vec![7])])
    );
    assert_eq!(encode(&Some(vec![9u8])).unwrap(), Value::Bytes(vec![9]));
}

// =============================================================================
// Containers
// =============================================================================

/// Sets and maps resolve to their concrete backing types
#[test]
fn test_sets_and_maps() {
    let v = arr([1i64, 2, 2, 3]);
    let set: HashSet<i64> = decode(&v).unwrap();
    assert_eq!(set.len(), 3);

    let m = obj([("b", 2i64), ("a", 1)]);
    let map: BTreeMap<String, i64> = decode(&m).unwrap();
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
}

/// Every failing element of an array is reported
#[test]
fn test_vec_decode_aggregates_failures() {
    let err = decode::<Vec<i64>>(&arr([Value::from("x"), Value::Long(1), Value::Null])).unwrap_err();
    match err {
        Error::Aggregate { failures } => {
            let at: Vec<Segment> = failures.into_iter().map(|(s, _)| s).collect();
            assert_eq!(at, vec![Segment::Index(0), Segment::Index(2)]);
        }
        other => panic!("Expected Aggregate, got {:?}", other),
    }
}

/// Options map Null to None in both directions
#[test]
fn test_option_null() {
    assert_eq!(decode::<Option<String>>(&Value::Null).unwrap(), None);
    assert_eq!(encode(&None::<String>).unwrap(), Value::Null);
    assert_eq!(
        decode::<Option<String>>(&Value::from("x")).unwrap(),
        Some("x".to_string())
    );
}
