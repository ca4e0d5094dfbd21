//! Typed accessors into a Value tree
//!
//! A [`Field<T>`] pairs a [`Path`] with a [`Codec<T>`]. Reading a field walks
//! the path first (short-circuiting on the first missing segment) and then
//! decodes the located value.
//!
//! ```
//! use faunadb_core::{Field, Value};
//!
//! let spell: Value = [("data", [("name", "Fire Beak")].into_iter().collect::<Value>())]
//!     .into_iter()
//!     .collect();
//!
//! let name = Field::at_keys(["data", "name"]).to::<String>();
//! assert_eq!(name.get(&spell).unwrap(), "Fire Beak");
//! ```
//!
//! Identity (`Eq`, `Hash`) is the path alone; two fields with the same path
//! and different codecs compare equal.

use crate::codec::{Codec, Decode, Encode, TypeCodec, VALUE};
use crate::error::{Error, Result};
use crate::path::{Path, Segment};
use crate::value::{Object, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A path plus the codec applied to the value found there
pub struct Field<T> {
    path: Path,
    codec: Arc<dyn Codec<T>>,
}

impl Field<Value> {
    /// Field for the root value itself
    pub fn root() -> Self {
        Field::at_path(Path::root())
    }

    /// Field navigating object keys in sequence
    pub fn at_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Field::at_path(Path::from_keys(keys))
    }

    /// Field navigating array indexes in sequence
    pub fn at_indexes<I>(indexes: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Field::at_path(Path::from_indexes(indexes))
    }

    /// Field at an arbitrary path
    pub fn at_path(path: Path) -> Self {
        Field {
            path,
            codec: Arc::new(VALUE),
        }
    }
}

impl<T: 'static> Field<T> {
    /// Field with an explicit codec
    pub fn with_codec<C: Codec<T> + 'static>(path: Path, codec: C) -> Self {
        Field {
            path,
            codec: Arc::new(codec),
        }
    }

    /// Path walked by this field
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Codec applied at the end of the path
    pub fn codec(&self) -> &Arc<dyn Codec<T>> {
        &self.codec
    }

    /// Continue into `other`: paths concatenate, `other`'s codec applies
    pub fn at<U: 'static>(&self, other: &Field<U>) -> Field<U> {
        Field {
            path: self.path.concat(&other.path),
            codec: Arc::clone(&other.codec),
        }
    }

    /// Same path, decoded as `U`
    pub fn to<U>(&self) -> Field<U>
    where
        U: Decode + Encode + 'static,
    {
        self.to_codec(TypeCodec::<U>::new())
    }

    /// Same path, decoded with `codec`
    pub fn to_codec<U: 'static, C: Codec<U> + 'static>(&self, codec: C) -> Field<U> {
        Field {
            path: self.path.clone(),
            codec: Arc::new(codec),
        }
    }

    /// Apply `inner` to every element of the array at this path
    ///
    /// Succeeds with results in array order when every element succeeds.
    /// Otherwise fails with one [`Error::Aggregate`] naming each failing index.
    pub fn collect<U: 'static>(&self, inner: &Field<U>) -> Field<Vec<U>> {
        Field {
            path: self.path.clone(),
            codec: Arc::new(CollectCodec {
                path: inner.path.clone(),
                codec: Arc::clone(&inner.codec),
            }),
        }
    }

    /// Walk the path in `root` and decode the value found
    pub fn get(&self, root: &Value) -> Result<T> {
        let value = self.path.resolve(root)?;
        self.codec.decode(value)
    }

    /// Like [`get`](Self::get), but a missing path or a `Null` leaf is `None`
    pub fn get_optional(&self, root: &Value) -> Result<Option<T>> {
        match self.path.resolve(root) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => self.codec.decode(value).map(Some),
            Err(e) if e.is_path_error() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Field {
            path: self.path.clone(),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self.path)
    }
}

impl<T> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for Field<T> {}

impl<T> Hash for Field<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Codec behind [`Field::collect`]
struct CollectCodec<U> {
    path: Path,
    codec: Arc<dyn Codec<U>>,
}

impl<U> Codec<Vec<U>> for CollectCodec<U> {
    fn decode(&self, value: &Value) -> Result<Vec<U>> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(Error::wrong_type("Array", other)),
        };

        let mut out = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.path.resolve(item).and_then(|v| self.codec.decode(v)) {
                Ok(v) => out.push(v),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => failures.push((Segment::Index(i), e)),
            }
        }

        if failures.is_empty() {
            Ok(out)
        } else {
            Err(Error::Aggregate { failures })
        }
    }

    fn encode(&self, value: &Vec<U>) -> Result<Value> {
        value
            .iter()
            .enumerate()
            .map(|(i, item)| {
                self.codec
                    .encode(item)
                    .and_then(|leaf| wrap_at(&self.path, leaf))
                    .map_err(|e| e.nested(Segment::Index(i)))
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Rebuild the object nesting described by a key-only path
fn wrap_at(path: &Path, leaf: Value) -> Result<Value> {
    path.segments()
        .iter()
        .rev()
        .try_fold(leaf, |inner, segment| match segment {
            Segment::Key(key) => {
                let mut object = Object::new();
                object.insert(key.clone(), inner);
                Ok(Value::Object(object))
            }
            Segment::Index(_) => Err(Error::failure(format!(
                "cannot encode through array index in path {}",
                path
            ))),
        })
}
