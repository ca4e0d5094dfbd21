//! Resource pointers and opaque server values
//!
//! - [`Ref`]: typed pointer to a remote resource (`{"@ref": {...}}`)
//! - [`SetRef`]: opaque set definition (`{"@set": {...}}`)
//! - [`Query`]: opaque lambda body (`{"@query": {...}}`)
//!
//! `SetRef` and `Query` are carried exactly as received; the driver never
//! interprets their contents.

use crate::value::{Object, Value};
use std::fmt;

/// Typed pointer to a remote resource
///
/// A ref is an id qualified by an optional enclosing class and database.
/// Native refs (`classes`, `indexes`, `databases`, ...) have neither.
///
/// ## Equality
///
/// Two refs are equal iff id, class and database are all equal.
///
/// # Examples
///
/// ```
/// use faunadb_core::Ref;
///
/// let spells = Ref::class("spells");
/// let fire = Ref::instance(spells.clone(), "181388642046968320");
/// assert_eq!(fire.class_ref(), Some(&spells));
/// assert_eq!(spells.class_ref(), Some(&Ref::native("classes")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    id: String,
    class: Option<Box<Ref>>,
    database: Option<Box<Ref>>,
}

impl Ref {
    /// Create an unqualified ref
    pub fn new(id: impl Into<String>) -> Self {
        Ref {
            id: id.into(),
            class: None,
            database: None,
        }
    }

    /// Native ref such as `classes`, `indexes`, `databases`, `functions`, `keys`
    pub fn native(id: impl Into<String>) -> Self {
        Ref::new(id)
    }

    /// Ref to a class by name
    pub fn class(name: impl Into<String>) -> Self {
        Ref::new(name).with_class(Ref::native("classes"))
    }

    /// Ref to an index by name
    pub fn index(name: impl Into<String>) -> Self {
        Ref::new(name).with_class(Ref::native("indexes"))
    }

    /// Ref to a database by name
    pub fn database(name: impl Into<String>) -> Self {
        Ref::new(name).with_class(Ref::native("databases"))
    }

    /// Ref to an instance of `class`
    pub fn instance(class: Ref, id: impl Into<String>) -> Self {
        Ref::new(id).with_class(class)
    }

    /// Set the enclosing class (builder)
    pub fn with_class(mut self, class: Ref) -> Self {
        self.class = Some(Box::new(class));
        self
    }

    /// Set the enclosing database (builder)
    pub fn with_database(mut self, database: Ref) -> Self {
        self.database = Some(Box::new(database));
        self
    }

    /// Resource id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enclosing class, if any
    pub fn class_ref(&self) -> Option<&Ref> {
        self.class.as_deref()
    }

    /// Enclosing database, if any
    pub fn database_ref(&self) -> Option<&Ref> {
        self.database.as_deref()
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref(id = {}", self.id)?;
        if let Some(class) = &self.class {
            write!(f, ", class = {}", class)?;
        }
        if let Some(database) = &self.database {
            write!(f, ", database = {}", database)?;
        }
        write!(f, ")")
    }
}

/// Opaque set definition, e.g. the result of describing a `match`
#[derive(Debug, Clone, PartialEq)]
pub struct SetRef {
    parameters: Object,
}

impl SetRef {
    /// Wrap set parameters
    pub fn new(parameters: Object) -> Self {
        SetRef { parameters }
    }

    /// Set parameters as received
    pub fn parameters(&self) -> &Object {
        &self.parameters
    }

    /// Look up one parameter
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

/// Opaque serialized lambda body
///
/// Decodable only as itself; never converted to or from user types.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    body: Object,
}

impl Query {
    /// Wrap a lambda body
    pub fn new(body: Object) -> Self {
        Query { body }
    }

    /// Lambda body as received
    pub fn body(&self) -> &Object {
        &self.body
    }
}
