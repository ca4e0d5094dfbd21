//! Client error types

use faunadb_core::{Path, WireError};
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Category of a server-reported failure, from the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    /// 400: the query was invalid
    BadRequest,
    /// 401: the secret was missing or invalid
    Unauthorized,
    /// 403: the secret lacks permission
    PermissionDenied,
    /// 404: the resource does not exist
    NotFound,
    /// 500: the server failed
    Internal,
    /// 503: the server is unavailable
    Unavailable,
    /// Any other non-success status
    Unknown(u16),
}

impl ServerErrorKind {
    /// Map an HTTP status to a kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ServerErrorKind::BadRequest,
            401 => ServerErrorKind::Unauthorized,
            403 => ServerErrorKind::PermissionDenied,
            404 => ServerErrorKind::NotFound,
            500 => ServerErrorKind::Internal,
            503 => ServerErrorKind::Unavailable,
            other => ServerErrorKind::Unknown(other),
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServerErrorKind::Unavailable)
    }
}

impl fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErrorKind::BadRequest => write!(f, "bad request"),
            ServerErrorKind::Unauthorized => write!(f, "unauthorized"),
            ServerErrorKind::PermissionDenied => write!(f, "permission denied"),
            ServerErrorKind::NotFound => write!(f, "not found"),
            ServerErrorKind::Internal => write!(f, "internal error"),
            ServerErrorKind::Unavailable => write!(f, "unavailable"),
            ServerErrorKind::Unknown(status) => write!(f, "unexpected status {}", status),
        }
    }
}

/// One entry of a server error response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    /// Machine-readable code, e.g. `instance not found`
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Location of the failing sub-expression within the query
    pub position: Path,
}

impl ServerError {
    /// Parse one entry of the `errors` array
    ///
    /// Missing members become empty; position items are keys (strings) or
    /// indexes (integers).
    pub fn from_json(json: &JsonValue) -> Self {
        let text = |key: &str| {
            json.get(key)
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let mut position = Path::root();
        if let Some(items) = json.get("position").and_then(JsonValue::as_array) {
            for item in items {
                match item {
                    JsonValue::String(key) => position = position.key(key.as_str()),
                    JsonValue::Number(n) => {
                        if let Some(index) = n.as_u64() {
                            position = position.index(index as usize);
                        }
                    }
                    _ => {}
                }
            }
        }
        ServerError {
            code: text("code"),
            description: text("description"),
            position,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)?;
        if !self.position.is_root() {
            write!(f, " at {}", self.position)?;
        }
        Ok(())
    }
}

/// Failure while submitting a query or reading its result
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not complete the exchange
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected the query
    #[error("{kind} (status {status}): {}", summarize(.errors))]
    Server {
        /// Category from the HTTP status
        kind: ServerErrorKind,
        /// HTTP status
        status: u16,
        /// Entries of the `errors` array
        errors: Vec<ServerError>,
    },

    /// The response body was not valid wire JSON
    #[error("invalid response: {0}")]
    Wire(#[from] WireError),

    /// The result could not be decoded into the requested type
    #[error("failed to decode result: {0}")]
    Decode(#[from] faunadb_core::Error),

    /// The response did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Client configuration is invalid or unreadable
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Server error category, if the server rejected the query
    pub fn server_kind(&self) -> Option<ServerErrorKind> {
        match self {
            ClientError::Server { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn summarize(errors: &[ServerError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ServerError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
