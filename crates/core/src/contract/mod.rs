//! Wire contract types
//!
//! Scalar types with a dedicated tag in the wire format. Each one is a
//! payload of a [`Value`](crate::Value) variant.
//!
//! ## Module Structure
//!
//! - `timestamp`: Nanosecond instants (`@ts`)
//! - `refs`: Resource pointers (`@ref`), set definitions (`@set`), lambda bodies (`@query`)
//!
//! Dates (`@date`) use [`chrono::NaiveDate`] directly.

pub mod refs;
pub mod timestamp;

// Re-exports
pub use refs::{Query, Ref, SetRef};
pub use timestamp::Timestamp;
