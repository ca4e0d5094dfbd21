//! Query submission
//!
//! ## Flow
//!
//! 1. The expression is escaped and serialized.
//! 2. The transport posts it with the last-seen transaction time.
//! 3. The reply's transaction time advances the client's (never backwards).
//! 4. A 2xx body's `resource` member is parsed into a Value; any other
//!    status becomes [`ClientError::Server`] built from the `errors` array.

use crate::error::{ClientError, ClientResult, ServerError, ServerErrorKind};
use crate::transport::{Request, Response, Transport};
use faunadb_core::{json_to_value, Decode, Expr, Value};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, warn};

const NO_TXN: i64 = 0;

/// Query client over a [`Transport`]
///
/// Safe to share between threads; the only mutable state is the last-seen
/// transaction time, which is updated lock-free.
pub struct Client<T> {
    transport: T,
    last_txn: AtomicI64,
}

impl<T: Transport> Client<T> {
    /// Create a client over `transport`
    pub fn new(transport: T) -> Self {
        Client {
            transport,
            last_txn: AtomicI64::new(NO_TXN),
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Highest transaction time seen so far (microseconds)
    pub fn last_txn_time(&self) -> Option<i64> {
        match self.last_txn.load(Ordering::Acquire) {
            NO_TXN => None,
            ts => Some(ts),
        }
    }

    /// Advance the last-seen transaction time to `ts` if it is newer
    pub fn sync_last_txn_time(&self, ts: i64) {
        let previous = self.last_txn.fetch_max(ts, Ordering::AcqRel);
        if ts > previous {
            debug!(target: "faunadb::client", previous, current = ts, "Transaction time advanced");
        }
    }

    /// Run one expression and return its result
    pub fn query(&self, expr: impl Into<Expr>) -> ClientResult<Value> {
        let expr = expr.into();
        let response = self.execute(&expr)?;
        self.parse_resource(&response)
    }

    /// Run several expressions in one request
    ///
    /// Results are returned in the order of `exprs`.
    pub fn query_batch(&self, exprs: Vec<Expr>) -> ClientResult<Vec<Value>> {
        let expected = exprs.len();
        match self.query(Expr::Array(exprs))? {
            Value::Array(items) if items.len() == expected => Ok(items),
            Value::Array(items) => Err(ClientError::UnexpectedResponse(format!(
                "expected {} results but received {}",
                expected,
                items.len()
            ))),
            other => Err(ClientError::UnexpectedResponse(format!(
                "expected an array of results but received {}",
                other.type_name()
            ))),
        }
    }

    /// Run one expression and decode its result into `R`
    pub fn query_as<R: Decode>(&self, expr: impl Into<Expr>) -> ClientResult<R> {
        let value = self.query(expr)?;
        Ok(R::decode(&value)?)
    }

    fn execute(&self, expr: &Expr) -> ClientResult<Response> {
        let request = Request {
            body: expr.to_json_string(),
            last_seen_txn: self.last_txn_time(),
        };
        debug!(
            target: "faunadb::client",
            bytes = request.body.len(),
            last_seen_txn = ?request.last_seen_txn,
            "Query submitted"
        );

        let response = self.transport.execute(&request)?;
        debug!(target: "faunadb::client", status = response.status, "Response received");

        if let Some(ts) = response.txn_time {
            self.sync_last_txn_time(ts);
        }
        Ok(response)
    }

    fn parse_resource(&self, response: &Response) -> ClientResult<Value> {
        let json = parse_body(&response.body);

        if !response.is_success() {
            let errors = json
                .as_ref()
                .ok()
                .and_then(|j| j.get("errors"))
                .and_then(JsonValue::as_array)
                .map(|items| items.iter().map(ServerError::from_json).collect())
                .unwrap_or_default();
            let err = ClientError::Server {
                kind: ServerErrorKind::from_status(response.status),
                status: response.status,
                errors,
            };
            warn!(target: "faunadb::client", error = %err, "Query rejected");
            return Err(err);
        }

        let json = json?;
        let resource = json.get("resource").ok_or_else(|| {
            ClientError::UnexpectedResponse("response has no \"resource\" member".to_string())
        })?;
        Ok(json_to_value(resource)?)
    }
}

const BODY_EXCERPT_CHARS: usize = 200;

fn parse_body(body: &str) -> ClientResult<JsonValue> {
    serde_json::from_str(body).map_err(|e| {
        ClientError::UnexpectedResponse(format!(
            "invalid JSON body ({}): {}",
            e,
            excerpt(body)
        ))
    })
}

/// Leading characters of `body`, cut on a char boundary
fn excerpt(body: &str) -> &str {
    body.char_indices()
        .nth(BODY_EXCERPT_CHARS)
        .map_or(body, |(i, _)| &body[..i])
}
