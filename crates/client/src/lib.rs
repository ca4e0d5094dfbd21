//! Query client for FaunaDB
//!
//! This crate sits between the value model in `faunadb-core` and the network:
//! - Transport: the boundary trait (post one JSON document, get one back)
//! - Client: escaping, submission, response parsing, transaction time
//! - ClientConfig: settings loaded from `faunadb.toml`
//! - HttpTransport (feature `http`): blocking transport backed by `ureq`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod transport;

pub use client::Client;
pub use config::{ClientConfig, CONFIG_FILE_NAME, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
pub use error::{ClientError, ClientResult, ServerError, ServerErrorKind};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use transport::{Request, Response, Transport};
