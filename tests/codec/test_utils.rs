//! Test utilities for the codec suite
//!
//! Shared fixture types and value builders.

pub use faunadb::{
    decode, encode, Error, Expr, Field, FaunaEnum, FaunaObject, NaiveDate, Path, Ref, Segment,
    Timestamp, Value,
};

// =============================================================================
// Value Builders
// =============================================================================

/// Build an Object value from key/value pairs
pub fn obj<K: Into<String>, V: Into<Value>>(pairs: impl IntoIterator<Item = (K, V)>) -> Value {
    pairs.into_iter().collect()
}

/// Build an Array value from anything convertible to Value
pub fn arr<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

/// Parse wire JSON, panicking on malformed test input
pub fn wire(json: &str) -> Value {
    faunadb::from_json_str(json).expect("test JSON should parse")
}

/// Object keys in order
pub fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("expected an Object")
        .keys()
        .map(String::as_str)
        .collect()
}

// =============================================================================
// Fixture Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, FaunaEnum)]
#[fauna(crate = "faunadb")]
pub enum Element {
    #[fauna(rename = "fire")]
    Fire,
    #[fauna(rename = "water")]
    Water,
    Earth,
}

/// Memberwise-created type with the common field attributes
#[derive(Debug, Clone, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb")]
pub struct Spell {
    pub name: String,
    pub element: Element,
    pub cost: i32,
    #[fauna(rename = "school_name")]
    pub school: Option<String>,
    #[fauna(default = "default_level")]
    pub level: i64,
    #[fauna(skip)]
    pub cast_count: u32,
}

pub fn default_level() -> i64 {
    1
}

/// Factory-created type with a computed property and a settable extra field
#[derive(Debug, Clone, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb", factory = "Wand::create", params("core", "length"))]
#[fauna(property(name = "label", get = "label"))]
pub struct Wand {
    pub core: String,
    pub length: f64,
    pub charges: i64,
}

impl Wand {
    pub fn create(core: String, length: f64) -> Self {
        Wand {
            core,
            length,
            charges: 0,
        }
    }

    pub fn label(&self) -> String {
        format!("{} ({}in)", self.core, self.length)
    }
}

/// Type created with `Default` and filled entirely through its fields
#[derive(Debug, Clone, Default, PartialEq, FaunaObject)]
#[fauna(crate = "faunadb", default)]
pub struct Settings {
    pub theme: String,
    #[fauna(rename = "font_size")]
    pub size: i64,
}
