//! Core types and codecs for the FaunaDB driver
//!
//! This crate defines the data model shared by every layer of the driver:
//! - Value: closed sum type for every wire value (scalars, refs, containers)
//! - Contract types: Timestamp (nanosecond precision), Ref, SetRef, Query
//! - Wire JSON: tagged encoding (`@ref`, `@ts`, `@date`, `@bytes`, `@set`, `@query`, `@obj`)
//! - Expr: expression tree with literal escaping (`{"object": ...}`)
//! - Path / Field: typed accessors into a Value tree with structured failures
//! - Codec: per-type bidirectional converters (`Decode`, `Encode`, `Codec<T>`)
//! - Object mapping: descriptors for user types, built once and cached per type
//!
//! Expected failures (missing keys, type mismatches, aggregates) are returned
//! as [`Error`] values; nothing in this crate panics on bad input data.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Lets derive output name `::faunadb_core` from inside this crate.
extern crate self as faunadb_core;

pub mod codec;
pub mod contract;
pub mod error;
pub mod expr;
pub mod field;
pub mod json;
pub mod object;
pub mod path;
pub mod value;

pub use codec::{
    decode, encode, Bytes, BytesCodec, Codec, Decode, Encode, Encoder, FnCodec, ListCodec,
    MapCodec, MappedCodec, OptionalCodec, SetCodec, TypeCodec,
};
pub use contract::{Query, Ref, SetRef, Timestamp};
pub use error::{ConfigError, Error, Result};
pub use expr::Expr;
pub use field::Field;
pub use json::{from_json_str, json_to_value, to_json_string, value_to_json, WireError};
pub use object::{
    decode_enum, decode_object, descriptor, encode_enum, encode_object, CreatorArgs, CreatorKind,
    DescriptorBuilder, EnumTable, FaunaEnum, FaunaObject, ObjectDescriptor,
};
pub use path::{Path, PathParseError, Segment};
pub use value::{Object, Value};

/// Calendar date carried by [`Value::Date`]
pub use chrono::NaiveDate;
