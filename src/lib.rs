//! FaunaDB driver: typed values, codecs and a query client
//!
//! # Quick Start
//!
//! ```ignore
//! use faunadb::{Client, ClientConfig, Expr, FaunaObject, Ref};
//!
//! #[derive(FaunaObject)]
//! #[fauna(crate = "faunadb")]
//! struct Spell {
//!     name: String,
//!     element: Option<String>,
//! }
//!
//! let client = Client::connect(ClientConfig::from_file("faunadb.toml".as_ref())?)?;
//! let spell: Spell = client.query_as(
//!     Expr::call("select", Expr::from("data"))
//! )?;
//! ```
//!
//! # Architecture
//!
//! - `faunadb-core`: value algebra, wire JSON, expression escaping, paths,
//!   codecs and object mapping
//! - `faunadb-derive`: `#[derive(FaunaObject)]` and `#[derive(FaunaEnum)]`
//! - `faunadb-client`: transport boundary, query submission, configuration
//!
//! Derive output names `::faunadb_core` by default; code depending only on
//! this crate adds `#[fauna(crate = "faunadb")]`.

pub use faunadb_core::*;
pub use faunadb_derive::{FaunaEnum, FaunaObject};

pub use faunadb_client::{
    Client, ClientConfig, ClientError, ClientResult, Request, Response, ServerError,
    ServerErrorKind, Transport, CONFIG_FILE_NAME, DEFAULT_API_VERSION, DEFAULT_ENDPOINT,
};
#[cfg(feature = "http")]
pub use faunadb_client::HttpTransport;

/// Query client modules
pub mod client {
    pub use faunadb_client::*;
}
