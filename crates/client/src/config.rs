//! Client configuration via `faunadb.toml`
//!
//! Only `secret` is required; every other setting has a default.

use crate::error::{ClientError, ClientResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "faunadb.toml";

/// Default service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://db.fauna.com";

/// Default wire API version
pub const DEFAULT_API_VERSION: &str = "2.7";

/// Connection settings loaded from `faunadb.toml`
///
/// # Example
///
/// ```toml
/// secret = "fnAC..."
/// endpoint = "https://db.fauna.com"
/// timeout_ms = 60000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Key secret sent with every request
    pub secret: String,
    /// Request timeout in milliseconds (default: 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Wire API version header value
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Optional `User-Agent` override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl ClientConfig {
    /// Config with defaults and the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        ClientConfig {
            endpoint: default_endpoint(),
            secret: secret.into(),
            timeout_ms: default_timeout_ms(),
            api_version: default_api_version(),
            user_agent: None,
        }
    }

    /// Set the endpoint (builder)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the timeout (builder)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `Authorization` header value: basic auth with the secret as user name
    pub fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:", self.secret)))
    }

    /// Check the settings
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty, the endpoint is not an
    /// http(s) URL, or the timeout is zero.
    pub fn validate(&self) -> ClientResult<()> {
        if self.secret.trim().is_empty() {
            return Err(ClientError::Config("secret must not be empty".to_string()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "endpoint '{}' must start with http:// or https://",
                self.endpoint
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# FaunaDB client configuration
#
# Key secret used for every request (required).
secret = "replace-with-your-key-secret"

# Service endpoint (default: https://db.fauna.com)
endpoint = "https://db.fauna.com"

# Request timeout in milliseconds (default: 60000)
timeout_ms = 60000

# Wire API version (default: "2.7")
api_version = "2.7"

# Optional User-Agent override
# user_agent = "my-app/1.0"
"#
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> ClientResult<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ClientError::Config(msg) => {
                ClientError::Config(format!("{} (in '{}')", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> ClientResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            ClientError::Config(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
