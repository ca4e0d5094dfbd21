//! Value types for the FaunaDB wire model
//!
//! This module defines:
//! - Value: closed sum type for every data point the wire protocol carries
//! - Object: insertion-ordered string-keyed map used by `Value::Object`
//!
//! ## Variants
//!
//! Null, Boolean, Long, Double, String, Timestamp, Date, Bytes, Array,
//! Object, Ref, SetRef, Query.
//!
//! ### Type Rules
//!
//! - No implicit coercions: `Long(1) != Double(1.0)`
//! - `Bytes` are not `String`
//! - Double uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Object equality ignores key order; key order is kept for serialization
//! - Values are immutable once built; there is no in-place mutation API

use crate::codec::Decode;
use crate::contract::{Query, Ref, SetRef, Timestamp};
use crate::error::Result;
use crate::field::Field;
use crate::path::Path;
use chrono::NaiveDate;
use indexmap::IndexMap;

/// Object payload: unique string keys in insertion order
pub type Object = IndexMap<String, Value>;

/// Any value the wire protocol can carry
///
/// ## Type Equality
///
/// Different variants are never equal, even when they hold the "same" data:
/// - `Long(1) != Double(1.0)`
/// - `Bytes(b"hi") != String("hi")`
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit floating point (IEEE-754)
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Instant with nanosecond precision
    Timestamp(Timestamp),
    /// Calendar date without timezone
    Date(NaiveDate),
    /// Opaque binary payload
    Bytes(Vec<u8>),
    /// Ordered heterogeneous list
    Array(Vec<Value>),
    /// String-keyed map
    Object(Object),
    /// Pointer to a remote resource
    Ref(Ref),
    /// Opaque set definition
    SetRef(SetRef),
    /// Opaque lambda body
    Query(Query),
}

impl Value {
    /// Get the variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Long(_) => "Long",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Date(_) => "Date",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Ref(_) => "Ref",
            Value::SetRef(_) => "SetRef",
            Value::Query(_) => "Query",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if this is a container (array or object)
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Get as bool if this is a Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is a Long value
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Double value
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[u8] if this is a Bytes value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &Object if this is an Object value
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as &Ref if this is a Ref value
    pub fn as_ref_value(&self) -> Option<&Ref> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Navigate to the value at `path`
    pub fn at(&self, path: &Path) -> Result<&Value> {
        path.resolve(self)
    }

    /// Extract and decode a field
    pub fn get<T: 'static>(&self, field: &Field<T>) -> Result<T> {
        field.get(self)
    }

    /// Decode this value into `T`
    pub fn decode<T: Decode>(&self) -> Result<T> {
        T::decode(self)
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Long(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Double(f as f64)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        Value::Ref(r)
    }
}

impl From<SetRef> for Value {
    fn from(s: SetRef) -> Self {
        Value::SetRef(s)
    }
}

impl From<Query> for Value {
    fn from(q: Query) -> Self {
        Value::Query(q)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    /// Collect key/value pairs into an Object
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
