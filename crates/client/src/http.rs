//! Blocking HTTP transport backed by `ureq`

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{
    Request, Response, Transport, API_VERSION_HEADER, LAST_SEEN_TXN_HEADER, TXN_TIME_HEADER,
};

/// HTTP transport posting queries to the configured endpoint
pub struct HttpTransport {
    agent: ureq::Agent,
    config: ClientConfig,
    authorization: String,
}

impl HttpTransport {
    /// Build a transport from validated settings
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build();
        Ok(HttpTransport {
            agent: ureq::Agent::new_with_config(agent_config),
            authorization: config.authorization(),
            config,
        })
    }

    /// Settings in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &Request) -> ClientResult<Response> {
        let mut call = self
            .agent
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Authorization", &self.authorization)
            .header(API_VERSION_HEADER, &self.config.api_version);

        if let Some(agent) = &self.config.user_agent {
            call = call.header("User-Agent", agent);
        }
        if let Some(ts) = request.last_seen_txn {
            call = call.header(LAST_SEEN_TXN_HEADER, &ts.to_string());
        }

        let mut response = call.send(request.body.as_bytes()).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("timed out") || msg.contains("Timeout") {
                ClientError::Transport(format!(
                    "request timed out after {}ms",
                    self.config.timeout_ms
                ))
            } else {
                ClientError::Transport(msg)
            }
        })?;

        let status = response.status().as_u16();
        let txn_time = response
            .headers()
            .get(TXN_TIME_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport(format!("failed to read response: {}", e)))?;

        Ok(Response {
            status,
            body,
            txn_time,
        })
    }
}

impl Client<HttpTransport> {
    /// Client over HTTP with the given settings
    pub fn connect(config: ClientConfig) -> ClientResult<Self> {
        Ok(Client::new(HttpTransport::new(config)?))
    }
}
