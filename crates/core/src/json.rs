//! Wire JSON encoding for Values
//!
//! Values without a native JSON form are carried as single-key tagged
//! objects:
//!
//! | Type | JSON Representation |
//! |------|---------------------|
//! | Ref | `{"@ref": {"id": "...", "class": <ref>?, "database": <ref>?}}` |
//! | SetRef | `{"@set": {...}}` |
//! | Timestamp | `{"@ts": "2015-01-15T13:56:51.123456789Z"}` |
//! | Date | `{"@date": "2015-01-15"}` |
//! | Bytes | `{"@bytes": "<url-safe base64>"}` |
//! | Query | `{"@query": {...}}` |
//! | Object with a reserved key | `{"@obj": {...}}` |
//!
//! On input, an object whose first key is one of these tags is decoded as the
//! tagged variant; any other object is a plain Object. Objects written by
//! [`value_to_json`] that contain a reserved key are wrapped in `@obj`, so
//! every Value round-trips.
//!
//! Non-finite doubles have no JSON form and are written as `null`.

use crate::contract::{Query, Ref, SetRef, Timestamp};
use crate::value::{Object, Value};
use base64::{engine::general_purpose::URL_SAFE, Engine};
use chrono::NaiveDate;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

/// Tag for refs
pub const REF_TAG: &str = "@ref";
/// Tag for set definitions
pub const SET_TAG: &str = "@set";
/// Tag for timestamps
pub const TS_TAG: &str = "@ts";
/// Tag for dates
pub const DATE_TAG: &str = "@date";
/// Tag for binary payloads
pub const BYTES_TAG: &str = "@bytes";
/// Tag for lambda bodies
pub const QUERY_TAG: &str = "@query";
/// Tag for literal objects containing reserved keys
pub const OBJ_TAG: &str = "@obj";

/// All reserved wire tags
pub const RESERVED_TAGS: [&str; 7] = [
    REF_TAG, SET_TAG, TS_TAG, DATE_TAG, BYTES_TAG, QUERY_TAG, OBJ_TAG,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error decoding wire JSON
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Text is not valid JSON
    #[error("invalid JSON: {0}")]
    Syntax(String),

    /// Tagged object has a malformed payload
    #[error("invalid {tag} value: {reason}")]
    InvalidTag {
        /// Tag that was being decoded
        tag: &'static str,
        /// What was wrong with the payload
        reason: String,
    },

    /// Number is neither an i64 nor a finite f64
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Expression contains an operator call where a literal was required
    #[error("expression is an operator call ({0}), not a literal value")]
    NotLiteral(String),
}

/// Check whether `key` is a reserved wire tag
pub fn is_reserved_tag(key: &str) -> bool {
    RESERVED_TAGS.contains(&key)
}

// =============================================================================
// Value -> JSON
// =============================================================================

/// Convert a Value to wire JSON
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Long(i) => JsonValue::Number((*i).into()),
        Value::Double(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Timestamp(ts) => json!({ TS_TAG: ts.to_string() }),
        Value::Date(d) => json!({ DATE_TAG: d.format(DATE_FORMAT).to_string() }),
        Value::Bytes(b) => json!({ BYTES_TAG: URL_SAFE.encode(b) }),
        Value::Array(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Object(fields) => {
            let obj = JsonValue::Object(fields_to_json(fields));
            if fields.keys().any(|k| is_reserved_tag(k)) {
                json!({ OBJ_TAG: obj })
            } else {
                obj
            }
        }
        Value::Ref(r) => json!({ REF_TAG: ref_body_to_json(r) }),
        Value::SetRef(s) => json!({ SET_TAG: fields_to_json(s.parameters()) }),
        Value::Query(q) => json!({ QUERY_TAG: fields_to_json(q.body()) }),
    }
}

fn fields_to_json(fields: &Object) -> Map<String, JsonValue> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect()
}

fn ref_body_to_json(r: &Ref) -> JsonValue {
    let mut body = Map::new();
    body.insert("id".to_string(), JsonValue::String(r.id().to_string()));
    if let Some(class) = r.class_ref() {
        body.insert("class".to_string(), json!({ REF_TAG: ref_body_to_json(class) }));
    }
    if let Some(database) = r.database_ref() {
        body.insert(
            "database".to_string(),
            json!({ REF_TAG: ref_body_to_json(database) }),
        );
    }
    JsonValue::Object(body)
}

/// Serialize a Value to a compact wire JSON string
pub fn to_json_string(value: &Value) -> String {
    value_to_json(value).to_string()
}

// =============================================================================
// JSON -> Value
// =============================================================================

/// Convert wire JSON to a Value, decoding tagged objects
pub fn json_to_value(json: &JsonValue) -> Result<Value, WireError> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Long(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Double(f))
            } else {
                Err(WireError::InvalidNumber(n.to_string()))
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(arr) => {
            let items: Result<Vec<Value>, WireError> = arr.iter().map(json_to_value).collect();
            Ok(Value::Array(items?))
        }
        JsonValue::Object(obj) => {
            if let Some((key, body)) = obj.iter().next() {
                if let Some(tag) = RESERVED_TAGS.iter().copied().find(|t| *t == key.as_str()) {
                    if obj.len() != 1 {
                        return Err(WireError::InvalidTag {
                            tag,
                            reason: format!("expected a single key, found {}", obj.len()),
                        });
                    }
                    return tagged_to_value(tag, body);
                }
            }
            Ok(Value::Object(json_to_fields(obj)?))
        }
    }
}

fn json_to_fields(obj: &Map<String, JsonValue>) -> Result<Object, WireError> {
    obj.iter()
        .map(|(k, v)| json_to_value(v).map(|val| (k.clone(), val)))
        .collect()
}

fn tagged_to_value(tag: &'static str, body: &JsonValue) -> Result<Value, WireError> {
    let invalid = |reason: String| WireError::InvalidTag { tag, reason };
    match tag {
        REF_TAG => Ok(Value::Ref(json_to_ref(body)?)),
        SET_TAG => Ok(Value::SetRef(SetRef::new(tagged_object(tag, body)?))),
        QUERY_TAG => Ok(Value::Query(Query::new(tagged_object(tag, body)?))),
        OBJ_TAG => Ok(Value::Object(tagged_object(tag, body)?)),
        TS_TAG => {
            let s = tagged_str(tag, body)?;
            s.parse::<Timestamp>()
                .map(Value::Timestamp)
                .map_err(|e| invalid(format!("{:?}: {}", s, e)))
        }
        DATE_TAG => {
            let s = tagged_str(tag, body)?;
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| invalid(format!("{:?}: {}", s, e)))
        }
        BYTES_TAG => {
            let s = tagged_str(tag, body)?;
            URL_SAFE
                .decode(s)
                .map(Value::Bytes)
                .map_err(|e| invalid(format!("invalid base64: {}", e)))
        }
        _ => Err(invalid("unknown tag".to_string())),
    }
}

fn tagged_str<'a>(tag: &'static str, body: &'a JsonValue) -> Result<&'a str, WireError> {
    body.as_str().ok_or_else(|| WireError::InvalidTag {
        tag,
        reason: format!("expected a string, found {}", json_kind(body)),
    })
}

fn tagged_object(tag: &'static str, body: &JsonValue) -> Result<Object, WireError> {
    match body {
        JsonValue::Object(obj) => json_to_fields(obj),
        other => Err(WireError::InvalidTag {
            tag,
            reason: format!("expected an object, found {}", json_kind(other)),
        }),
    }
}

fn json_to_ref(body: &JsonValue) -> Result<Ref, WireError> {
    let invalid = |reason: String| WireError::InvalidTag {
        tag: REF_TAG,
        reason,
    };
    let obj = body
        .as_object()
        .ok_or_else(|| invalid(format!("expected an object, found {}", json_kind(body))))?;
    let id = obj
        .get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| invalid("missing string \"id\"".to_string()))?;

    let mut r = Ref::new(id);
    if let Some(class) = obj.get("class") {
        r = r.with_class(nested_ref(class, "class")?);
    }
    if let Some(database) = obj.get("database") {
        r = r.with_database(nested_ref(database, "database")?);
    }
    Ok(r)
}

fn nested_ref(json: &JsonValue, role: &str) -> Result<Ref, WireError> {
    match json_to_value(json)? {
        Value::Ref(r) => Ok(r),
        other => Err(WireError::InvalidTag {
            tag: REF_TAG,
            reason: format!("\"{}\" must be a ref, found {}", role, other.type_name()),
        }),
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Parse a wire JSON string into a Value
pub fn from_json_str(s: &str) -> Result<Value, WireError> {
    let json: JsonValue =
        serde_json::from_str(s).map_err(|e| WireError::Syntax(e.to_string()))?;
    json_to_value(&json)
}

// =============================================================================
// serde integration
// =============================================================================

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        json_to_value(&json).map_err(de::Error::custom)
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        value_to_json(&v)
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = WireError;

    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        json_to_value(&json)
    }
}
