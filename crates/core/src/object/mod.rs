//! Mapping user types to and from Object values
//!
//! User structs implement [`FaunaObject`] (normally via
//! `#[derive(FaunaObject)]`) to describe their creator and properties once.
//! The description is validated and cached per type on first use; a type
//! whose description is invalid fails every decode and encode with the same
//! [`ConfigError`].
//!
//! Unit-only enums implement [`FaunaEnum`] (via `#[derive(FaunaEnum)]`) and
//! travel as strings.

mod descriptor;
mod enums;
mod registry;

pub use descriptor::{CreatorArgs, CreatorKind, DescriptorBuilder, ObjectDescriptor};
pub use enums::{decode_enum, encode_enum, enum_table, EnumTable, FaunaEnum};
pub use registry::cached_entries;

use crate::codec::Encoder;
use crate::error::{ConfigError, Error, Result};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// User type with a declared object mapping
pub trait FaunaObject: Sized + 'static {
    /// Describe how to create, read and write this type
    fn describe() -> std::result::Result<ObjectDescriptor<Self>, ConfigError>;
}

type CachedDescriptor<T> = std::result::Result<Arc<ObjectDescriptor<T>>, ConfigError>;

/// Cached descriptor for `T`
pub fn descriptor<T: FaunaObject>() -> Result<Arc<ObjectDescriptor<T>>> {
    let cached = registry::get_or_build::<CachedDescriptor<T>, _>(|| {
        let described = T::describe();
        match &described {
            Ok(d) => debug!(
                target: "faunadb::codec",
                type_name = d.type_name(),
                creator = %d.creator_kind(),
                properties = d.read_properties().count(),
                "Registered object descriptor"
            ),
            Err(e) => warn!(target: "faunadb::codec", error = %e, "Invalid object mapping"),
        }
        described.map(Arc::new)
    });
    match cached.as_ref() {
        Ok(d) => Ok(Arc::clone(d)),
        Err(e) => Err(Error::Config(e.clone())),
    }
}

/// Decode `T` through its cached descriptor
pub fn decode_object<T: FaunaObject>(value: &Value) -> Result<T> {
    descriptor::<T>()?.decode(value)
}

/// Encode `T` through its cached descriptor
pub fn encode_object<T: FaunaObject>(instance: &T, encoder: &mut Encoder) -> Result<Value> {
    descriptor::<T>()?.encode(instance, encoder)
}
