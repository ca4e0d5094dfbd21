//! Per-type object mapping
//!
//! An [`ObjectDescriptor<T>`] lists how a user type is created from an
//! Object and which named properties it reads and writes. Descriptors are
//! produced by `#[derive(FaunaObject)]` or by hand with [`DescriptorBuilder`].
//!
//! ## Decoding
//!
//! 1. The creator runs. Factory beats designated constructor beats default
//!    constructor; only the highest-priority one declared is used.
//! 2. Every write property not consumed as a creator parameter is set from
//!    the same-named field, when that field is present.
//!
//! Failures from both phases are reported together.
//!
//! ## Encoding
//!
//! Read properties are encoded in declaration order into an Object. The
//! instance is marked in progress first, so a cycle fails before any
//! property is read.

use crate::codec::{Decode, Encode, Encoder};
use crate::error::{ConfigError, Error, Result};
use crate::path::{Path, Segment};
use crate::value::{Object, Value};
use std::collections::HashSet;
use std::fmt;

/// Creator declared for a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatorKind {
    /// Associated function taking named parameters
    Factory,
    /// Designated constructor taking named parameters
    Constructor,
    /// Zero-argument constructor; every field is set afterwards
    DefaultConstructor,
}

impl CreatorKind {
    fn priority(self) -> u8 {
        match self {
            CreatorKind::Factory => 0,
            CreatorKind::Constructor => 1,
            CreatorKind::DefaultConstructor => 2,
        }
    }
}

impl fmt::Display for CreatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatorKind::Factory => write!(f, "factory"),
            CreatorKind::Constructor => write!(f, "constructor"),
            CreatorKind::DefaultConstructor => write!(f, "default constructor"),
        }
    }
}

/// Named parameter lookup handed to a creator
///
/// Failures are recorded as they happen so that every bad parameter is
/// reported, even when the creator stops at the first one.
pub struct CreatorArgs<'a> {
    type_name: &'static str,
    fields: &'a Object,
    failures: Vec<(Segment, Error)>,
}

impl<'a> CreatorArgs<'a> {
    fn new(type_name: &'static str, fields: &'a Object) -> Self {
        CreatorArgs {
            type_name,
            fields,
            failures: Vec::new(),
        }
    }

    /// Type being created
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Raw field value, if present
    pub fn value(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    /// Decode parameter `name`
    ///
    /// A missing field decodes from `Null`, so optional parameters become
    /// `None`. Any other missing parameter fails with `KeyNotFound`.
    pub fn get<U: Decode>(&mut self, name: &str) -> Result<U> {
        let result = match self.fields.get(name) {
            Some(value) => U::decode(value),
            None => U::decode(&Value::Null).map_err(|_| Error::KeyNotFound {
                path: Path::root(),
                key: name.to_string(),
            }),
        };
        self.record(name, result)
    }

    /// Decode parameter `name`, or use `default` when the field is missing
    pub fn get_or_else<U, F>(&mut self, name: &str, default: F) -> Result<U>
    where
        U: Decode,
        F: FnOnce() -> U,
    {
        match self.fields.get(name) {
            Some(value) => {
                let result = U::decode(value);
                self.record(name, result)
            }
            None => Ok(default()),
        }
    }

    fn record<U>(&mut self, name: &str, result: Result<U>) -> Result<U> {
        result.map_err(|e| {
            self.failures.push((Segment::Key(name.to_string()), e.clone()));
            e
        })
    }
}

type CreateFn<T> = Box<dyn Fn(&mut CreatorArgs<'_>) -> Result<T> + Send + Sync>;
type ReadFn<T> = Box<dyn Fn(&T, &mut Encoder) -> Result<Value> + Send + Sync>;
type WriteFn<T> = Box<dyn Fn(&mut T, &Value) -> Result<()> + Send + Sync>;

struct Creator<T> {
    kind: CreatorKind,
    params: Vec<String>,
    create: CreateFn<T>,
}

struct Property<F> {
    name: String,
    access: F,
}

/// Validated mapping for one user type
pub struct ObjectDescriptor<T> {
    type_name: &'static str,
    creator: Creator<T>,
    readers: Vec<Property<ReadFn<T>>>,
    writers: Vec<Property<WriteFn<T>>>,
}

impl<T: 'static> ObjectDescriptor<T> {
    /// Start describing `T`
    pub fn builder() -> DescriptorBuilder<T> {
        DescriptorBuilder::new()
    }

    /// Described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Creator selected for this type
    pub fn creator_kind(&self) -> CreatorKind {
        self.creator.kind
    }

    /// Creator parameter names, in order
    pub fn creator_params(&self) -> &[String] {
        &self.creator.params
    }

    /// Names of the encoded properties, in order
    pub fn read_properties(&self) -> impl Iterator<Item = &str> {
        self.readers.iter().map(|p| p.name.as_str())
    }

    /// Names of the properties set after creation
    pub fn write_properties(&self) -> impl Iterator<Item = &str> {
        self.writers.iter().map(|p| p.name.as_str())
    }

    /// Build an instance from an Object value
    pub fn decode(&self, value: &Value) -> Result<T> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(Error::wrong_type("Object", other)),
        };

        let mut args = CreatorArgs::new(self.type_name, fields);
        let created = (self.creator.create)(&mut args);
        let mut failures = args.failures;
        if let Some((_, fatal)) = failures.iter().find(|(_, e)| e.is_fatal()) {
            return Err(fatal.clone());
        }

        let mut instance = match created {
            Ok(instance) if failures.is_empty() => instance,
            Err(e) if failures.is_empty() => return Err(e),
            _ => return Err(Error::Aggregate { failures }),
        };

        for writer in &self.writers {
            if self.creator.params.contains(&writer.name) {
                continue;
            }
            let Some(value) = fields.get(&writer.name) else {
                continue;
            };
            if let Err(e) = (writer.access)(&mut instance, value) {
                if e.is_fatal() {
                    return Err(e);
                }
                failures.push((Segment::Key(writer.name.clone()), e));
            }
        }

        if failures.is_empty() {
            Ok(instance)
        } else {
            Err(Error::Aggregate { failures })
        }
    }

    /// Encode an instance's read properties into an Object value
    pub fn encode(&self, instance: &T, encoder: &mut Encoder) -> Result<Value> {
        encoder.scoped(instance, |encoder| {
            let mut object = Object::with_capacity(self.readers.len());
            for reader in &self.readers {
                let value = (reader.access)(instance, encoder)
                    .map_err(|e| e.nested(Segment::Key(reader.name.clone())))?;
                object.insert(reader.name.clone(), value);
            }
            Ok(Value::Object(object))
        })
    }
}

impl<T> fmt::Debug for ObjectDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDescriptor")
            .field("type_name", &self.type_name)
            .field("creator", &self.creator.kind)
            .field("params", &self.creator.params)
            .field(
                "readers",
                &self.readers.iter().map(|p| &p.name).collect::<Vec<_>>(),
            )
            .field(
                "writers",
                &self.writers.iter().map(|p| &p.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`ObjectDescriptor`]
///
/// ```
/// use faunadb_core::{ObjectDescriptor, Value};
///
/// #[derive(Default)]
/// struct Counter {
///     name: String,
///     hits: i64,
/// }
///
/// let descriptor = ObjectDescriptor::<Counter>::builder()
///     .constructor(["name"], |args| {
///         Ok(Counter { name: args.get("name")?, hits: 0 })
///     })
///     .field("name", |c: &Counter| &c.name, |c: &mut Counter, v| c.name = v)
///     .field("hits", |c: &Counter| &c.hits, |c: &mut Counter, v| c.hits = v)
///     .build()
///     .unwrap();
///
/// let v: Value = [("name", Value::from("home")), ("hits", Value::Long(3))]
///     .into_iter()
///     .collect();
/// let counter = descriptor.decode(&v).unwrap();
/// assert_eq!((counter.name.as_str(), counter.hits), ("home", 3));
/// ```
pub struct DescriptorBuilder<T> {
    type_name: &'static str,
    creators: Vec<Creator<T>>,
    readers: Vec<Property<ReadFn<T>>>,
    writers: Vec<Property<WriteFn<T>>>,
}

impl<T: 'static> DescriptorBuilder<T> {
    /// Start an empty description of `T`
    pub fn new() -> Self {
        DescriptorBuilder {
            type_name: std::any::type_name::<T>(),
            creators: Vec::new(),
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Override the type name used in messages
    pub fn type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    fn creator<I, S, F>(mut self, kind: CreatorKind, params: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut CreatorArgs<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.creators.push(Creator {
            kind,
            params: params.into_iter().map(Into::into).collect(),
            create: Box::new(create),
        });
        self
    }

    /// Declare a factory taking the named parameters
    pub fn factory<I, S, F>(self, params: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut CreatorArgs<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.creator(CreatorKind::Factory, params, create)
    }

    /// Declare the designated constructor taking the named parameters
    pub fn constructor<I, S, F>(self, params: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut CreatorArgs<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.creator(CreatorKind::Constructor, params, create)
    }

    /// Declare a zero-argument constructor
    pub fn default_constructor<F>(self, create: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.creator(
            CreatorKind::DefaultConstructor,
            std::iter::empty::<String>(),
            move |_| Ok(create()),
        )
    }

    /// Declare a property that is both encoded and set after creation
    pub fn field<U, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        U: Decode + Encode + 'static,
        G: Fn(&T) -> &U + Send + Sync + 'static,
        S: Fn(&mut T, U) + Send + Sync + 'static,
    {
        self.read_with(name, move |instance, encoder| encoder.encode(get(instance)))
            .write(name, set)
    }

    /// Declare an encoded property computed from the instance
    pub fn computed<U, G>(self, name: &str, get: G) -> Self
    where
        U: Encode + 'static,
        G: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.read_with(name, move |instance, encoder| encoder.encode(&get(instance)))
    }

    /// Declare an encoded property with full control over encoding
    pub fn read_with<F>(mut self, name: &str, read: F) -> Self
    where
        F: Fn(&T, &mut Encoder) -> Result<Value> + Send + Sync + 'static,
    {
        self.readers.push(Property {
            name: name.to_string(),
            access: Box::new(read),
        });
        self
    }

    /// Declare a property that is only set after creation
    pub fn write<U, S>(mut self, name: &str, set: S) -> Self
    where
        U: Decode + 'static,
        S: Fn(&mut T, U) + Send + Sync + 'static,
    {
        self.writers.push(Property {
            name: name.to_string(),
            access: Box::new(move |instance: &mut T, value: &Value| {
                set(instance, U::decode(value)?);
                Ok(())
            }),
        });
        self
    }

    /// Validate and finish the descriptor
    pub fn build(self) -> std::result::Result<ObjectDescriptor<T>, ConfigError> {
        let type_name = self.type_name;

        let creator = self
            .creators
            .into_iter()
            .min_by_key(|c| c.kind.priority())
            .ok_or(ConfigError::NoCreator { type_name })?;

        if let Some(position) = creator.params.iter().position(|p| p.is_empty()) {
            return Err(ConfigError::UnnamedParameter {
                type_name,
                kind: creator.kind,
                position,
            });
        }

        check_unique(type_name, &self.readers)?;
        check_unique(type_name, &self.writers)?;

        Ok(ObjectDescriptor {
            type_name,
            creator,
            readers: self.readers,
            writers: self.writers,
        })
    }
}

impl<T: 'static> Default for DescriptorBuilder<T> {
    fn default() -> Self {
        DescriptorBuilder::new()
    }
}

fn check_unique<F>(
    type_name: &'static str,
    properties: &[Property<F>],
) -> std::result::Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for property in properties {
        if !seen.insert(property.name.as_str()) {
            return Err(ConfigError::DuplicateProperty {
                type_name,
                name: property.name.clone(),
            });
        }
    }
    Ok(())
}
