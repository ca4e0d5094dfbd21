//! Scalar Decode/Encode implementations

use super::{Codec, Decode, Encode, Encoder};
use crate::contract::{Query, Ref, SetRef, Timestamp};
use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, Utc};

impl Decode for Value {
    fn decode(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl Encode for Value {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(self.clone())
    }
}

impl Decode for () {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(Error::wrong_type("Null", other)),
        }
    }
}

impl Encode for () {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Null)
    }
}

impl Decode for bool {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(Error::wrong_type("Boolean", other)),
        }
    }
}

impl Encode for bool {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Boolean(*self))
    }
}

// Narrowing is two's-complement truncation of the wire i64.
macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn decode(value: &Value) -> Result<Self> {
                match value {
                    Value::Long(n) => Ok(*n as $t),
                    other => Err(Error::wrong_type("Long", other)),
                }
            }
        }

        impl Encode for $t {
            fn encode(&self, _: &mut Encoder) -> Result<Value> {
                Ok(Value::Long(*self as i64))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize, u16, u32);

impl Decode for u8 {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Long(n) => Ok(*n as u8),
            other => Err(Error::wrong_type("Long", other)),
        }
    }
}

impl Encode for u8 {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Long(*self as i64))
    }

    fn encode_slice(items: &[Self], _: &mut Encoder) -> Result<Value> {
        Ok(Value::Bytes(items.to_vec()))
    }
}

macro_rules! impl_wide_unsigned {
    ($($t:ty),*) => {$(
        impl Decode for $t {
            fn decode(value: &Value) -> Result<Self> {
                match value {
                    Value::Long(n) => Ok(*n as $t),
                    other => Err(Error::wrong_type("Long", other)),
                }
            }
        }

        impl Encode for $t {
            fn encode(&self, _: &mut Encoder) -> Result<Value> {
                i64::try_from(*self).map(Value::Long).map_err(|_| {
                    Error::failure(format!(
                        "{} {} does not fit in a 64-bit signed integer",
                        stringify!($t),
                        self
                    ))
                })
            }
        }
    )*};
}

impl_wide_unsigned!(u64, usize);

impl Decode for f64 {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Double(f) => Ok(*f),
            other => Err(Error::wrong_type("Double", other)),
        }
    }
}

impl Encode for f64 {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Double(*self))
    }
}

impl Decode for f32 {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Double(f) => Ok(*f as f32),
            other => Err(Error::wrong_type("Double", other)),
        }
    }
}

impl Encode for f32 {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Double(*self as f64))
    }
}

impl Decode for String {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::wrong_type("String", other)),
        }
    }
}

impl Encode for String {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Encode for str {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl Decode for char {
    fn decode(value: &Value) -> Result<Self> {
        let s = String::decode(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::failure(format!(
                "expected a single character but found \"{}\"",
                s
            ))),
        }
    }
}

impl Encode for char {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl Decode for Timestamp {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(Error::wrong_type("Timestamp", other)),
        }
    }
}

impl Encode for Timestamp {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Timestamp(*self))
    }
}

impl Decode for DateTime<Utc> {
    fn decode(value: &Value) -> Result<Self> {
        let ts = Timestamp::decode(value)?;
        ts.to_datetime()
            .ok_or_else(|| Error::failure(format!("timestamp {} is out of range", ts.secs())))
    }
}

impl Encode for DateTime<Utc> {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Timestamp(Timestamp::from_datetime(*self)))
    }
}

impl Decode for NaiveDate {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(*d),
            other => Err(Error::wrong_type("Date", other)),
        }
    }
}

impl Encode for NaiveDate {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Date(*self))
    }
}

impl Decode for Ref {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Ref(r) => Ok(r.clone()),
            other => Err(Error::wrong_type("Ref", other)),
        }
    }
}

impl Encode for Ref {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Ref(self.clone()))
    }
}

impl Decode for SetRef {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::SetRef(s) => Ok(s.clone()),
            other => Err(Error::wrong_type("SetRef", other)),
        }
    }
}

impl Encode for SetRef {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::SetRef(self.clone()))
    }
}

impl Decode for Query {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Query(q) => Ok(q.clone()),
            other => Err(Error::wrong_type("Query", other)),
        }
    }
}

impl Encode for Query {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Query(self.clone()))
    }
}

/// Binary payload carried as `Value::Bytes`
///
/// `Vec<u8>` encodes to the same variant; `Bytes` additionally refuses to
/// decode from an array of integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Borrow the payload
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Take the payload
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b.0)
    }
}

impl Decode for Bytes {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(Bytes(b.clone())),
            other => Err(Error::wrong_type("Bytes", other)),
        }
    }
}

impl Encode for Bytes {
    fn encode(&self, _: &mut Encoder) -> Result<Value> {
        Ok(Value::Bytes(self.0.clone()))
    }
}

/// Codec for `Vec<u8>` over `Value::Bytes`
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec<Vec<u8>> for BytesCodec {
    fn decode(&self, value: &Value) -> Result<Vec<u8>> {
        Bytes::decode(value).map(Bytes::into_inner)
    }

    fn encode(&self, value: &Vec<u8>) -> Result<Value> {
        Ok(Value::Bytes(value.clone()))
    }
}
