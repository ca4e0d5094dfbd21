//! Container and pointer Decode/Encode implementations
//!
//! Arrays decode element by element and objects entry by entry. Every
//! element is attempted; all failures are returned together as one
//! [`Error::Aggregate`] naming the index or key of each. A fatal failure
//! (configuration or cycle) stops decoding immediately.

use super::{Codec, Decode, Encode, Encoder};
use crate::error::{Error, Result};
use crate::path::Segment;
use crate::value::{Object, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// Decode every element, collecting all non-fatal failures
fn decode_all<'v, T, I, F>(items: I, mut decode_one: F) -> Result<Vec<T>>
where
    I: IntoIterator<Item = (Segment, &'v Value)>,
    F: FnMut(&Value) -> Result<T>,
{
    let mut out = Vec::new();
    let mut failures = Vec::new();
    for (segment, item) in items {
        match decode_one(item) {
            Ok(v) => out.push(v),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => failures.push((segment, e)),
        }
    }
    if failures.is_empty() {
        Ok(out)
    } else {
        Err(Error::Aggregate { failures })
    }
}

/// Decode an array (or a byte string, one `Long` per byte)
fn decode_array<T, F>(value: &Value, decode_one: F) -> Result<Vec<T>>
where
    F: FnMut(&Value) -> Result<T>,
{
    match value {
        Value::Array(items) => decode_all(
            items.iter().enumerate().map(|(i, v)| (Segment::Index(i), v)),
            decode_one,
        ),
        Value::Bytes(bytes) => {
            let items: Vec<Value> = bytes.iter().map(|b| Value::Long(*b as i64)).collect();
            decode_all(
                items.iter().enumerate().map(|(i, v)| (Segment::Index(i), v)),
                decode_one,
            )
        }
        other => Err(Error::wrong_type("Array", other)),
    }
}

/// Decode an object's values, keeping its keys
fn decode_entries<T, F>(value: &Value, mut decode_one: F) -> Result<Vec<(String, T)>>
where
    F: FnMut(&Value) -> Result<T>,
{
    let object = match value {
        Value::Object(o) => o,
        other => return Err(Error::wrong_type("Object", other)),
    };
    let values = decode_all(
        object.iter().map(|(k, v)| (Segment::Key(k.clone()), v)),
        |v| decode_one(v),
    )?;
    Ok(object.keys().cloned().zip(values).collect())
}

fn encode_all<'a, T, I>(items: I, encoder: &mut Encoder) -> Result<Value>
where
    T: Encode + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            encoder
                .encode(item)
                .map_err(|e| e.nested(Segment::Index(i)))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn encode_entries<'a, K, V, I>(entries: I, encoder: &mut Encoder) -> Result<Value>
where
    K: fmt::Display + 'a,
    V: Encode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut object = Object::new();
    for (k, v) in entries {
        let key = k.to_string();
        let value = encoder
            .encode(v)
            .map_err(|e| e.nested(Segment::Key(key.clone())))?;
        object.insert(key, value);
    }
    Ok(Value::Object(object))
}

// =============================================================================
// Sequences
// =============================================================================

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value) -> Result<Self> {
        decode_array(value, T::decode)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        T::encode_slice(self, encoder)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        T::encode_slice(self, encoder)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(value: &Value) -> Result<Self> {
        let items = decode_array(value, T::decode)?;
        let len = items.len();
        items.try_into().map_err(|_| {
            Error::failure(format!("expected an array of {} elements but found {}", N, len))
        })
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        T::encode_slice(self.as_slice(), encoder)
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode(value: &Value) -> Result<Self> {
        decode_array(value, T::decode).map(VecDeque::from)
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_all(self, encoder)
    }
}

impl<T, S> Decode for HashSet<T, S>
where
    T: Decode + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode(value: &Value) -> Result<Self> {
        decode_array(value, T::decode).map(|items| items.into_iter().collect())
    }
}

impl<T: Encode, S> Encode for HashSet<T, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_all(self, encoder)
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode(value: &Value) -> Result<Self> {
        decode_array(value, T::decode).map(|items| items.into_iter().collect())
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_all(self, encoder)
    }
}

// =============================================================================
// Maps
// =============================================================================

impl<T: Decode, S> Decode for HashMap<String, T, S>
where
    S: BuildHasher + Default,
{
    fn decode(value: &Value) -> Result<Self> {
        decode_entries(value, T::decode).map(|entries| entries.into_iter().collect())
    }
}

impl<K: fmt::Display, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_entries(self, encoder)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(value: &Value) -> Result<Self> {
        decode_entries(value, T::decode).map(|entries| entries.into_iter().collect())
    }
}

impl<K: fmt::Display, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_entries(self, encoder)
    }
}

impl<T: Decode> Decode for IndexMap<String, T> {
    fn decode(value: &Value) -> Result<Self> {
        decode_entries(value, T::decode).map(|entries| entries.into_iter().collect())
    }
}

impl<K: fmt::Display, V: Encode> Encode for IndexMap<K, V> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        encode_entries(self, encoder)
    }
}

// =============================================================================
// Option and pointers
// =============================================================================

impl<T: Decode> Decode for Option<T> {
    fn decode(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        match self {
            Some(v) => encoder.encode(v),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(value: &Value) -> Result<Self> {
        T::decode(value).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Rc<T> {
    fn decode(value: &Value) -> Result<Self> {
        T::decode(value).map(Rc::new)
    }
}

impl<T: Encode + ?Sized> Encode for Rc<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Arc<T> {
    fn decode(value: &Value) -> Result<Self> {
        T::decode(value).map(Arc::new)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for RefCell<T> {
    fn decode(value: &Value) -> Result<Self> {
        T::decode(value).map(RefCell::new)
    }
}

impl<T: Encode> Encode for RefCell<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<Value> {
        let inner = self.try_borrow().map_err(|_| {
            Error::failure(format!(
                "cannot encode {} while it is mutably borrowed",
                std::any::type_name::<T>()
            ))
        })?;
        (*inner).encode(encoder)
    }
}

// =============================================================================
// Container codecs
// =============================================================================

/// Array codec over an element codec, producing `Vec<T>`
pub struct ListCodec<C, T> {
    element: C,
    _marker: PhantomData<fn() -> T>,
}

impl<C: Codec<T>, T> ListCodec<C, T> {
    /// Wrap an element codec
    pub fn new(element: C) -> Self {
        ListCodec {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C: Codec<T>, T> Codec<Vec<T>> for ListCodec<C, T> {
    fn decode(&self, value: &Value) -> Result<Vec<T>> {
        decode_array(value, |v| self.element.decode(v))
    }

    fn encode(&self, value: &Vec<T>) -> Result<Value> {
        value
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.element
                    .encode(item)
                    .map_err(|e| e.nested(Segment::Index(i)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Array codec over an element codec, producing `HashSet<T>`
pub struct SetCodec<C, T> {
    element: C,
    _marker: PhantomData<fn() -> T>,
}

impl<C: Codec<T>, T: Eq + Hash> SetCodec<C, T> {
    /// Wrap an element codec
    pub fn new(element: C) -> Self {
        SetCodec {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C: Codec<T>, T: Eq + Hash> Codec<HashSet<T>> for SetCodec<C, T> {
    fn decode(&self, value: &Value) -> Result<HashSet<T>> {
        decode_array(value, |v| self.element.decode(v)).map(|items| items.into_iter().collect())
    }

    fn encode(&self, value: &HashSet<T>) -> Result<Value> {
        value
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.element
                    .encode(item)
                    .map_err(|e| e.nested(Segment::Index(i)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Object codec over a value codec, producing `HashMap<String, T>`
pub struct MapCodec<C, T> {
    element: C,
    _marker: PhantomData<fn() -> T>,
}

impl<C: Codec<T>, T> MapCodec<C, T> {
    /// Wrap a value codec
    pub fn new(element: C) -> Self {
        MapCodec {
            element,
            _marker: PhantomData,
        }
    }
}

impl<C: Codec<T>, T> Codec<HashMap<String, T>> for MapCodec<C, T> {
    fn decode(&self, value: &Value) -> Result<HashMap<String, T>> {
        decode_entries(value, |v| self.element.decode(v)).map(|e| e.into_iter().collect())
    }

    fn encode(&self, value: &HashMap<String, T>) -> Result<Value> {
        let mut object = Object::new();
        for (k, v) in value {
            let encoded = self
                .element
                .encode(v)
                .map_err(|e| e.nested(Segment::Key(k.clone())))?;
            object.insert(k.clone(), encoded);
        }
        Ok(Value::Object(object))
    }
}
