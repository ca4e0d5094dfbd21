//! Bidirectional conversion between Values and Rust types
//!
//! Two layers:
//!
//! - [`Decode`] / [`Encode`]: type-driven conversions implemented for scalars,
//!   containers, smart pointers and (via derive) user types.
//! - [`Codec<T>`]: object-safe converter values used by [`Field`](crate::Field).
//!   [`TypeCodec<T>`] adapts any `Decode + Encode` type; the constants in this
//!   module cover every wire variant.
//!
//! Decoding never panics: a variant mismatch is an
//! [`Error::WrongType`](crate::Error::WrongType) naming the expected and
//! found variants. Container decoding reports every failing element in one
//! [`Error::Aggregate`](crate::Error::Aggregate).
//!
//! ## Numeric conversions
//!
//! The wire integer is 64-bit. Narrower integers decode by two's-complement
//! truncation of the 64-bit value (`300 -> i8` is `44`, `-129 -> i8` is `127`),
//! and encode losslessly. `u64`/`usize` values above `i64::MAX` fail to encode.
//! Byte sequences (`Vec<u8>`, `[u8]`, `[u8; N]`) encode as `Bytes` and decode
//! from either `Bytes` or an array of integers.
//! `f32` decodes by a precision-losing cast from the wire double.

mod collection;
mod scalar;

pub use collection::{ListCodec, MapCodec, SetCodec};
pub use scalar::{Bytes, BytesCodec};

use crate::contract::{Query, Ref, SetRef, Timestamp};
use crate::error::{Error, Result};
use crate::path::Segment;
use crate::value::{Object, Value};
use chrono::NaiveDate;
use std::fmt;
use std::marker::PhantomData;

/// Conversion from a Value
pub trait Decode: Sized {
    /// Decode `value`, failing on a variant or shape mismatch
    fn decode(value: &Value) -> Result<Self>;
}

/// Conversion into a Value
pub trait Encode {
    /// Encode `self`, recursing through `encoder` so cycles are caught
    fn encode(&self, encoder: &mut Encoder) -> Result<Value>;

    /// Encode a contiguous run of `Self`
    ///
    /// Sequences encode through this hook, so `u8` can emit `Bytes`.
    #[doc(hidden)]
    fn encode_slice(items: &[Self], encoder: &mut Encoder) -> Result<Value>
    where
        Self: Sized,
    {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                encoder
                    .encode(item)
                    .map_err(|e| e.nested(Segment::Index(i)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Encode any value with a fresh [`Encoder`]
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Value> {
    Encoder::new().encode(value)
}

/// Decode a value into `T`
pub fn decode<T: Decode>(value: &Value) -> Result<T> {
    T::decode(value)
}

// =============================================================================
// Encoder
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Identity {
    address: usize,
    type_name: &'static str,
}

/// Traversal state for one encode call
///
/// Tracks the objects currently being encoded by reference identity
/// (address and type). An object met again while it is still on the stack is
/// a cycle, reported as [`Error::SelfReference`] before any of its properties
/// are visited. Entries are popped on the way back up, so the same object may
/// appear any number of times in sibling positions.
#[derive(Debug, Default)]
pub struct Encoder {
    stack: Vec<Identity>,
}

impl Encoder {
    /// Create an encoder with an empty stack
    pub fn new() -> Self {
        Encoder { stack: Vec::new() }
    }

    /// Encode a nested value
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<Value> {
        value.encode(self)
    }

    /// Number of objects currently being encoded
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Run `f` with `value` marked as in progress
    ///
    /// Fails with [`Error::SelfReference`] without calling `f` when `value` is
    /// already in progress.
    pub fn scoped<T, F>(&mut self, value: &T, f: F) -> Result<Value>
    where
        T: ?Sized,
        F: FnOnce(&mut Encoder) -> Result<Value>,
    {
        // Zero-sized values share addresses and cannot hold a cycle.
        if std::mem::size_of_val(value) == 0 {
            return f(self);
        }
        let identity = Identity {
            address: value as *const T as *const () as usize,
            type_name: std::any::type_name::<T>(),
        };
        if self.stack.contains(&identity) {
            return Err(Error::SelfReference {
                type_name: identity.type_name,
                address: identity.address,
            });
        }
        self.stack.push(identity);
        let result = f(self);
        self.stack.pop();
        result
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Object-safe bidirectional converter for `T`
pub trait Codec<T>: Send + Sync {
    /// Decode a value; never panics
    fn decode(&self, value: &Value) -> Result<T>;

    /// Encode a value
    fn encode(&self, value: &T) -> Result<Value>;
}

/// [`Codec`] for any `Decode + Encode` type
pub struct TypeCodec<T>(PhantomData<fn() -> T>);

impl<T> TypeCodec<T> {
    /// Create the codec
    pub const fn new() -> Self {
        TypeCodec(PhantomData)
    }
}

impl<T> Default for TypeCodec<T> {
    fn default() -> Self {
        TypeCodec::new()
    }
}

impl<T> Clone for TypeCodec<T> {
    fn clone(&self) -> Self {
        TypeCodec::new()
    }
}

impl<T> Copy for TypeCodec<T> {}

impl<T> fmt::Debug for TypeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCodec<{}>", std::any::type_name::<T>())
    }
}

impl<T: Decode + Encode> Codec<T> for TypeCodec<T> {
    fn decode(&self, value: &Value) -> Result<T> {
        T::decode(value)
    }

    fn encode(&self, value: &T) -> Result<Value> {
        encode(value)
    }
}

/// Identity codec
pub const VALUE: TypeCodec<Value> = TypeCodec::new();
/// `Null` as `()`
pub const NULL: TypeCodec<()> = TypeCodec::new();
/// `Boolean` as `bool`
pub const BOOLEAN: TypeCodec<bool> = TypeCodec::new();
/// `Long` as `i64`
pub const LONG: TypeCodec<i64> = TypeCodec::new();
/// `Long` truncated to `i32`
pub const INTEGER: TypeCodec<i32> = TypeCodec::new();
/// `Long` truncated to `i16`
pub const SHORT: TypeCodec<i16> = TypeCodec::new();
/// `Long` truncated to `i8`
pub const BYTE: TypeCodec<i8> = TypeCodec::new();
/// `Double` as `f64`
pub const DOUBLE: TypeCodec<f64> = TypeCodec::new();
/// `Double` cast to `f32`
pub const FLOAT: TypeCodec<f32> = TypeCodec::new();
/// `String` as `String`
pub const STRING: TypeCodec<String> = TypeCodec::new();
/// `Timestamp` as [`Timestamp`]
pub const TIME: TypeCodec<Timestamp> = TypeCodec::new();
/// `Date` as [`NaiveDate`]
pub const DATE: TypeCodec<NaiveDate> = TypeCodec::new();
/// `Bytes` as `Vec<u8>`
pub const BYTES: BytesCodec = BytesCodec;
/// `Ref` as [`Ref`]
pub const REF: TypeCodec<Ref> = TypeCodec::new();
/// `SetRef` as [`SetRef`]
pub const SET_REF: TypeCodec<SetRef> = TypeCodec::new();
/// `Query` as [`Query`]
pub const QUERY: TypeCodec<Query> = TypeCodec::new();
/// `Array` as `Vec<Value>`
pub const ARRAY: TypeCodec<Vec<Value>> = TypeCodec::new();
/// `Object` as [`Object`]
pub const OBJECT: TypeCodec<Object> = TypeCodec::new();

// =============================================================================
// Combinators
// =============================================================================

/// Codec converting the output of another codec
///
/// `to` runs after the inner decode; `from` runs before the inner encode.
pub struct MappedCodec<C, T, U> {
    inner: C,
    to: Box<dyn Fn(T) -> Result<U> + Send + Sync>,
    from: Box<dyn Fn(&U) -> Result<T> + Send + Sync>,
}

impl<C, T, U> MappedCodec<C, T, U>
where
    C: Codec<T>,
{
    /// Wrap `inner` with conversions in both directions
    pub fn new<F, G>(inner: C, to: F, from: G) -> Self
    where
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
        G: Fn(&U) -> Result<T> + Send + Sync + 'static,
    {
        MappedCodec {
            inner,
            to: Box::new(to),
            from: Box::new(from),
        }
    }
}

impl<C, T, U> Codec<U> for MappedCodec<C, T, U>
where
    C: Codec<T>,
{
    fn decode(&self, value: &Value) -> Result<U> {
        self.inner.decode(value).and_then(|t| (self.to)(t))
    }

    fn encode(&self, value: &U) -> Result<Value> {
        (self.from)(value).and_then(|t| self.inner.encode(&t))
    }
}

type DecodeFn<T> = Box<dyn Fn(&Value) -> Result<T> + Send + Sync>;
type EncodeFn<T> = Box<dyn Fn(&T) -> Result<Value> + Send + Sync>;

/// Codec built from user closures
///
/// Failures raised by the closures are wrapped in a
/// [`Error::Failure`](crate::Error::Failure) naming the codec, with the
/// original failure as its cause.
pub struct FnCodec<T> {
    name: String,
    decode: DecodeFn<T>,
    encode: EncodeFn<T>,
}

impl<T> FnCodec<T> {
    /// Create a named codec
    pub fn new<D, E>(name: impl Into<String>, decode: D, encode: E) -> Self
    where
        D: Fn(&Value) -> Result<T> + Send + Sync + 'static,
        E: Fn(&T) -> Result<Value> + Send + Sync + 'static,
    {
        FnCodec {
            name: name.into(),
            decode: Box::new(decode),
            encode: Box::new(encode),
        }
    }

    /// Codec name used in failure messages
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Codec<T> for FnCodec<T> {
    fn decode(&self, value: &Value) -> Result<T> {
        (self.decode)(value).map_err(|e| {
            Error::failure_with_cause(format!("codec {} failed to decode value", self.name), e)
        })
    }

    fn encode(&self, value: &T) -> Result<Value> {
        (self.encode)(value).map_err(|e| {
            Error::failure_with_cause(format!("codec {} failed to encode value", self.name), e)
        })
    }
}

/// Codec mapping `Null` to `None` around another codec
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalCodec<C>(pub C);

impl<T, C: Codec<T>> Codec<Option<T>> for OptionalCodec<C> {
    fn decode(&self, value: &Value) -> Result<Option<T>> {
        match value {
            Value::Null => Ok(None),
            other => self.0.decode(other).map(Some),
        }
    }

    fn encode(&self, value: &Option<T>) -> Result<Value> {
        match value {
            Some(v) => self.0.encode(v),
            None => Ok(Value::Null),
        }
    }
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for std::sync::Arc<C> {
    fn decode(&self, value: &Value) -> Result<T> {
        (**self).decode(value)
    }

    fn encode(&self, value: &T) -> Result<Value> {
        (**self).encode(value)
    }
}
