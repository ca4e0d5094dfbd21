//! Tier 5: Properties
//!
//! Round-trip and escaping laws over generated values.

use crate::test_utils::*;
use faunadb::{from_json_str, to_json_string, value_to_json};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        prop::sample::select(vec!["@ref", "@ts", "@obj", "object", "create"]).prop_map(String::from),
    ]
}

/// JSON-safe scalars (no doubles, whose text form is not exact)
fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::Long),
        "[ -~]{0,12}".prop_map(Value::String),
    ]
}

fn literal() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..4)
                .prop_map(|pairs: Vec<(String, Value)>| pairs.into_iter().collect::<Value>()),
        ]
    })
}

// Years 0001 through 9999
fn timestamp() -> impl Strategy<Value = Timestamp> {
    (-62_135_596_800i64..253_402_300_799i64, 0u32..1_000_000_000u32)
        .prop_map(|(secs, nanos)| Timestamp::from_secs_nanos(secs, nanos))
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (1i32..3_652_059).prop_map(|days| NaiveDate::from_num_days_from_ce_opt(days).unwrap())
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    /// Scalars survive encode then decode
    #[test]
    fn prop_scalar_codec_round_trip(n in any::<i64>(), f in any::<f64>(), b in any::<bool>(), s in ".{0,16}") {
        prop_assert_eq!(decode::<i64>(&encode(&n).unwrap()).unwrap(), n);
        let back = decode::<f64>(&encode(&f).unwrap()).unwrap();
        prop_assert!(back == f || (back.is_nan() && f.is_nan()));
        prop_assert_eq!(decode::<bool>(&encode(&b).unwrap()).unwrap(), b);
        prop_assert_eq!(decode::<String>(&encode(&s).unwrap()).unwrap(), s);
    }

    /// Narrowing agrees with a two's-complement cast
    #[test]
    fn prop_narrowing_matches_cast(n in any::<i64>()) {
        let v = Value::Long(n);
        prop_assert_eq!(decode::<i8>(&v).unwrap(), n as i8);
        prop_assert_eq!(decode::<i16>(&v).unwrap(), n as i16);
        prop_assert_eq!(decode::<u32>(&v).unwrap(), n as u32);
    }

    /// Timestamps keep every nanosecond through the wire
    #[test]
    fn prop_timestamp_wire_round_trip(ts in timestamp()) {
        let v = Value::Timestamp(ts);
        prop_assert_eq!(from_json_str(&to_json_string(&v)).unwrap(), v);
        prop_assert_eq!(decode::<Timestamp>(&encode(&ts).unwrap()).unwrap(), ts);
    }

    /// Dates and bytes survive the wire
    #[test]
    fn prop_date_and_bytes_wire_round_trip(d in date(), bytes in prop::collection::vec(any::<u8>(), 0..48)) {
        let v = arr([Value::Date(d), Value::Bytes(bytes)]);
        prop_assert_eq!(from_json_str(&to_json_string(&v)).unwrap(), v);
    }

    /// Literal trees survive the wire, reserved keys included
    #[test]
    fn prop_literal_wire_round_trip(v in literal()) {
        prop_assert_eq!(from_json_str(&to_json_string(&v)).unwrap(), v);
    }

    /// Unescaping an escaped literal gives it back
    #[test]
    fn prop_escape_unescape_inverse(v in literal()) {
        let expr = Expr::from(v.clone());
        prop_assert!(!expr.is_operator());
        prop_assert_eq!(expr.unescape(), Some(v.clone()));

        let parsed = Expr::from_json(&expr.to_json()).unwrap();
        prop_assert_eq!(parsed.unescape(), Some(v));
    }

    /// Escaping leaves scalars untouched
    #[test]
    fn prop_escape_is_identity_on_scalars(v in leaf(), ts in timestamp()) {
        prop_assert_eq!(Expr::from(v.clone()).to_json(), value_to_json(&v));
        let t = Value::Timestamp(ts);
        prop_assert_eq!(Expr::from(t.clone()).to_json(), value_to_json(&t));
    }
}
