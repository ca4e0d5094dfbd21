//! Error types for value navigation and codecs
//!
//! Every decode, encode and path lookup returns [`Result`]. The variants map
//! onto five failure categories:
//!
//! | Category | Variants | Recoverable |
//! |----------|----------|-------------|
//! | Path resolution | `KeyNotFound`, `IndexNotFound`, `NotAContainer` | yes |
//! | Type mismatch | `WrongType` | yes |
//! | Aggregate | `Aggregate`, `Nested` | yes |
//! | Configuration | `Config` | no, same result on every call |
//! | Cycle | `SelfReference` | no |
//!
//! `Failure` carries a free-form message and optional cause for user codecs.

use crate::object::CreatorKind;
use crate::path::{Path, Segment};
use crate::value::Value;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure produced while navigating, decoding or encoding values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Object key missing at the given path
    #[error("object key \"{key}\" not found{}", at_path(.path))]
    KeyNotFound {
        /// Path of the object that was searched
        path: Path,
        /// Missing key
        key: String,
    },

    /// Array index out of range at the given path
    #[error("array index {index} not found{}", at_path(.path))]
    IndexNotFound {
        /// Path of the array that was searched
        path: Path,
        /// Missing index
        index: usize,
    },

    /// Path segment applied to a value that is not the right container
    #[error("cannot read {segment} from {actual}{}", at_path(.path))]
    NotAContainer {
        /// Path of the value that was navigated
        path: Path,
        /// Segment that could not be applied
        segment: Segment,
        /// Variant name of the value found
        actual: &'static str,
    },

    /// Value variant does not match what the codec expects
    #[error("expected {expected} but found {actual}")]
    WrongType {
        /// Variant name the codec accepts
        expected: &'static str,
        /// Variant name of the value found
        actual: &'static str,
    },

    /// One failure per element of an array or object
    #[error("{}", render_aggregate(.failures))]
    Aggregate {
        /// Element position and its failure, in source order
        failures: Vec<(Segment, Error)>,
    },

    /// Failure located under a single field or element
    #[error("{segment}: {source}")]
    Nested {
        /// Field or element the failure belongs to
        segment: Segment,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Target type cannot be mapped (fatal for that type)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Object graph refers back to an object still being encoded
    #[error("self reference loop detected for object {type_name} at {address:#x}")]
    SelfReference {
        /// Rust type of the offending object
        type_name: &'static str,
        /// Address of the offending object
        address: usize,
    },

    /// Free-form failure, usually raised by a user codec
    #[error("{message}")]
    Failure {
        /// Description of the failure
        message: String,
        /// Failure that caused this one
        #[source]
        cause: Option<Box<Error>>,
    },
}

impl Error {
    /// Build a type mismatch failure against the variant of `found`
    pub fn wrong_type(expected: &'static str, found: &Value) -> Self {
        Error::WrongType {
            expected,
            actual: found.type_name(),
        }
    }

    /// Build a free-form failure
    pub fn failure(message: impl Into<String>) -> Self {
        Error::Failure {
            message: message.into(),
            cause: None,
        }
    }

    /// Build a free-form failure wrapping another one
    pub fn failure_with_cause(message: impl Into<String>, cause: Error) -> Self {
        Error::Failure {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Attach a field or element position to this failure
    ///
    /// Fatal failures are returned unchanged so callers can still match on them.
    pub fn nested(self, segment: Segment) -> Self {
        if self.is_fatal() {
            return self;
        }
        Error::Nested {
            segment,
            source: Box::new(self),
        }
    }

    /// Whether this failure is a precondition violation rather than bad data
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_) | Error::SelfReference { .. })
    }

    /// Whether this failure comes from path navigation
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            Error::KeyNotFound { .. } | Error::IndexNotFound { .. } | Error::NotAContainer { .. }
        )
    }
}

/// Configuration errors for a target type
///
/// These mean the type's mapping is unusable. They are cached alongside the
/// type's descriptor, so every later decode of that type fails identically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No factory, designated constructor or default constructor declared
    #[error("no usable factory or constructor for type {type_name}")]
    NoCreator {
        /// Target type
        type_name: &'static str,
    },

    /// A creator parameter was declared without a name
    #[error("parameter {position} of the {kind} for type {type_name} has no name")]
    UnnamedParameter {
        /// Target type
        type_name: &'static str,
        /// Creator that declared the parameter
        kind: CreatorKind,
        /// Zero-based parameter position
        position: usize,
    },

    /// Two properties of the same direction share a name
    #[error("property \"{name}\" is declared more than once on type {type_name}")]
    DuplicateProperty {
        /// Target type
        type_name: &'static str,
        /// Duplicated property name
        name: String,
    },

    /// Two enum constants map to the same wire string
    #[error("enum {type_name} maps more than one constant to \"{name}\"")]
    DuplicateEnumName {
        /// Enum type
        type_name: &'static str,
        /// Duplicated wire name
        name: String,
    },
}

fn at_path(path: &Path) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!(" at {}", path)
    }
}

fn render_aggregate(failures: &[(Segment, Error)]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|(segment, err)| format!("{}: {}", segment.describe(), err))
        .collect();
    format!(
        "{} element(s) failed to decode: [{}]",
        failures.len(),
        parts.join("; ")
    )
}
