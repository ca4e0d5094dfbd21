//! Query expressions and literal escaping
//!
//! On the wire an operator call is an object keyed by the operator name, so
//! a literal object must be told apart from a call. Literals are escaped as
//! they enter the expression tree:
//!
//! - an object literal becomes `{"object": {...}}` with each field escaped
//! - an array literal keeps its shape with each element escaped
//! - every other value (null, scalars, refs, sets, queries) is a terminal leaf
//!
//! Operator nodes ([`Expr::Call`]) are written as-is.
//!
//! ```
//! use faunadb_core::{Expr, Value};
//!
//! let literal: Value = [("create", "not an operator")].into_iter().collect();
//! let expr = Expr::call("do", Expr::from(literal));
//! assert_eq!(
//!     expr.to_json().to_string(),
//!     r#"{"do":{"object":{"create":"not an operator"}}}"#
//! );
//! ```

use crate::contract::{Ref, Timestamp};
use crate::json::{is_reserved_tag, json_to_value, value_to_json, WireError};
use crate::value::Value;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

/// Key wrapping an escaped object literal
pub const OBJECT_KEY: &str = "object";

/// Node of a query expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Terminal literal
    ///
    /// Normally neither an array nor an object; a container placed here is
    /// still escaped when written.
    Value(Value),
    /// Array literal with escaped elements
    Array(Vec<Expr>),
    /// Object literal, written as `{"object": {...}}`
    Object(IndexMap<String, Expr>),
    /// Operator call, written as the bare object
    Call(IndexMap<String, Expr>),
}

impl Expr {
    /// The null literal
    pub fn null() -> Self {
        Expr::Value(Value::Null)
    }

    /// Single-argument operator call `{op: arg}`
    pub fn call(op: impl Into<String>, arg: impl Into<Expr>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(op.into(), arg.into());
        Expr::Call(fields)
    }

    /// Operator call with several named arguments, in the given order
    pub fn call_with<I, K, E>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        Expr::Call(
            pairs
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        )
    }

    /// Array literal
    pub fn array<I, E>(items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Array(items.into_iter().map(Into::into).collect())
    }

    /// Object literal
    pub fn object<I, K, E>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        Expr::Object(
            pairs
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        )
    }

    /// Whether this node is an operator call
    pub fn is_operator(&self) -> bool {
        matches!(self, Expr::Call(_))
    }

    /// Escaped wire document
    pub fn to_json(&self) -> JsonValue {
        match self {
            Expr::Value(v) => literal_to_json(v),
            Expr::Array(items) => JsonValue::Array(items.iter().map(Expr::to_json).collect()),
            Expr::Object(fields) => wrap_object(fields_to_json(fields)),
            Expr::Call(fields) => JsonValue::Object(fields_to_json(fields)),
        }
    }

    /// Escaped wire document as a compact string
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse an escaped wire document
    ///
    /// `{"object": {...}}` is an object literal, an object whose first key is
    /// a reserved wire tag is a tagged value, and any other object is a call.
    /// A tagged value that decodes to an object (`@obj`) becomes an object
    /// literal.
    pub fn from_json(json: &JsonValue) -> Result<Expr, WireError> {
        match json {
            JsonValue::Array(items) => items
                .iter()
                .map(Expr::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Expr::Array),
            JsonValue::Object(fields) => {
                if let Some(JsonValue::Object(inner)) = single(fields, OBJECT_KEY) {
                    return fields_from_json(inner).map(Expr::Object);
                }
                match fields.keys().next() {
                    Some(first) if is_reserved_tag(first) => json_to_value(json).map(Expr::from),
                    _ => fields_from_json(fields).map(Expr::Call),
                }
            }
            scalar => json_to_value(scalar).map(Expr::Value),
        }
    }

    /// Invert escaping, returning the literal value
    ///
    /// `None` when the tree contains an operator call.
    pub fn unescape(&self) -> Option<Value> {
        match self {
            Expr::Value(v) => Some(v.clone()),
            Expr::Array(items) => items
                .iter()
                .map(Expr::unescape)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Expr::Object(fields) => fields
                .iter()
                .map(|(k, e)| e.unescape().map(|v| (k.clone(), v)))
                .collect::<Option<_>>()
                .map(Value::Object),
            Expr::Call(_) => None,
        }
    }
}

fn single<'a>(fields: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    if fields.len() == 1 {
        fields.get(key)
    } else {
        None
    }
}

fn wrap_object(fields: Map<String, JsonValue>) -> JsonValue {
    let mut wrapper = Map::new();
    wrapper.insert(OBJECT_KEY.to_string(), JsonValue::Object(fields));
    JsonValue::Object(wrapper)
}

/// Escaped form of a literal value, wrapping every nested object
fn literal_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Object(fields) => wrap_object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), literal_to_json(v)))
                .collect(),
        ),
        Value::Array(items) => JsonValue::Array(items.iter().map(literal_to_json).collect()),
        other => value_to_json(other),
    }
}

fn fields_to_json(fields: &IndexMap<String, Expr>) -> Map<String, JsonValue> {
    fields
        .iter()
        .map(|(k, e)| (k.clone(), e.to_json()))
        .collect()
}

fn fields_from_json(fields: &Map<String, JsonValue>) -> Result<IndexMap<String, Expr>, WireError> {
    fields
        .iter()
        .map(|(k, v)| Expr::from_json(v).map(|e| (k.clone(), e)))
        .collect()
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// Escaping conversions
// ============================================================================

impl From<Value> for Expr {
    /// Escape a literal value
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Expr::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Expr::from(v)))
                    .collect(),
            ),
            Value::Array(items) => Expr::Array(items.into_iter().map(Expr::from).collect()),
            other => Expr::Value(other),
        }
    }
}

impl From<&Value> for Expr {
    fn from(value: &Value) -> Self {
        Expr::from(value.clone())
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_else(Expr::null)
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {$(
        impl From<$t> for Expr {
            fn from(v: $t) -> Self {
                Expr::Value(Value::from(v))
            }
        }
    )*};
}

impl_from_scalar!(&str, String, bool, i64, i32, f64, Ref, Timestamp, NaiveDate);
