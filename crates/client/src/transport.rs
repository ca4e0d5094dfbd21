//! Transport boundary
//!
//! A transport posts one JSON document and returns the raw reply. It owns
//! connections, TLS, timeouts and headers; the client owns everything about
//! the document itself.

use crate::error::ClientResult;

/// Header carrying the highest transaction time the client has seen
pub const LAST_SEEN_TXN_HEADER: &str = "X-Last-Seen-Txn";

/// Header carrying the transaction time of a response
pub const TXN_TIME_HEADER: &str = "X-Txn-Time";

/// Header carrying the wire API version
pub const API_VERSION_HEADER: &str = "X-FaunaDB-API-Version";

/// Outgoing query document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Escaped expression, serialized as JSON
    pub body: String,
    /// Last transaction time seen by the client (microseconds), if any
    pub last_seen_txn: Option<i64>,
}

/// Raw reply from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status
    pub status: u16,
    /// Response body
    pub body: String,
    /// Transaction time reported by the server (microseconds), if any
    pub txn_time: Option<i64>,
}

impl Response {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can exchange a query document for a reply
pub trait Transport: Send + Sync {
    /// Post `request` and wait for the reply
    ///
    /// Non-success statuses are returned as a [`Response`]; errors are
    /// reserved for exchanges that produced no reply at all.
    fn execute(&self, request: &Request) -> ClientResult<Response>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &Request) -> ClientResult<Response> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &Request) -> ClientResult<Response> {
        (**self).execute(request)
    }
}
