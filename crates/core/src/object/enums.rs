//! Enum constants as wire strings
//!
//! Each constant maps to one string (its name, or a rename). The two-way
//! table is built on first use per enum type and cached for the process.

use super::registry;
use crate::error::{ConfigError, Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Enum with a fixed set of wire names
///
/// Usually derived with `#[derive(FaunaEnum)]`.
pub trait FaunaEnum: Clone + Send + Sync + 'static {
    /// Every constant with its wire name, in declaration order
    const CONSTANTS: &'static [(Self, &'static str)];

    /// Position of `self` in [`CONSTANTS`](Self::CONSTANTS)
    fn ordinal(&self) -> usize;
}

/// Two-way name table for one enum type
#[derive(Debug)]
pub struct EnumTable<T> {
    type_name: &'static str,
    by_name: HashMap<&'static str, usize>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: FaunaEnum> EnumTable<T> {
    /// Build and validate the table
    pub fn build() -> std::result::Result<Self, ConfigError> {
        let type_name = std::any::type_name::<T>();
        let mut by_name = HashMap::with_capacity(T::CONSTANTS.len());
        for (ordinal, (_, name)) in T::CONSTANTS.iter().enumerate() {
            if by_name.insert(*name, ordinal).is_some() {
                return Err(ConfigError::DuplicateEnumName {
                    type_name,
                    name: name.to_string(),
                });
            }
        }
        Ok(EnumTable {
            type_name,
            by_name,
            _marker: std::marker::PhantomData,
        })
    }

    /// Wire name of a constant
    pub fn name_of(&self, constant: &T) -> Result<&'static str> {
        T::CONSTANTS
            .get(constant.ordinal())
            .map(|(_, name)| *name)
            .ok_or_else(|| {
                Error::failure(format!(
                    "ordinal {} is out of range for enum {}",
                    constant.ordinal(),
                    self.type_name
                ))
            })
    }

    /// Constant with the given wire name
    pub fn constant(&self, name: &str) -> Option<T> {
        self.by_name
            .get(name)
            .and_then(|ordinal| T::CONSTANTS.get(*ordinal))
            .map(|(constant, _)| constant.clone())
    }
}

type CachedTable<T> = std::result::Result<Arc<EnumTable<T>>, ConfigError>;

/// Cached table for `T`
///
/// An invalid mapping is cached too, so every call reports the same error.
pub fn enum_table<T: FaunaEnum>() -> Result<Arc<EnumTable<T>>> {
    let cached = registry::get_or_build::<CachedTable<T>, _>(|| {
        let table = EnumTable::<T>::build();
        match &table {
            Ok(_) => debug!(
                target: "faunadb::codec",
                type_name = std::any::type_name::<T>(),
                constants = T::CONSTANTS.len(),
                "Registered enum table"
            ),
            Err(e) => warn!(target: "faunadb::codec", error = %e, "Invalid enum mapping"),
        }
        table.map(Arc::new)
    });
    match cached.as_ref() {
        Ok(table) => Ok(Arc::clone(table)),
        Err(e) => Err(Error::Config(e.clone())),
    }
}

/// Encode a constant as its wire name
pub fn encode_enum<T: FaunaEnum>(constant: &T) -> Result<Value> {
    let table = enum_table::<T>()?;
    table.name_of(constant).map(|name| Value::String(name.to_string()))
}

/// Decode a constant from its wire name
pub fn decode_enum<T: FaunaEnum>(value: &Value) -> Result<T> {
    let table = enum_table::<T>()?;
    match value {
        Value::String(name) => table.constant(name).ok_or_else(|| {
            Error::failure(format!(
                "enum {} has no constant named \"{}\"",
                table.type_name, name
            ))
        }),
        other => Err(Error::wrong_type("String", other)),
    }
}
