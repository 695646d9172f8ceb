//! Connection configuration for the search engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and request settings for the search engine.
///
/// Every field has a default, so a partial TOML table deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Engine host name.
    pub host: String,
    /// Engine port.
    pub port: u16,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Use HTTPS instead of HTTP.
    pub use_ssl: bool,
    /// Verify TLS certificates.
    pub verify_certs: bool,
    /// Target index name.
    pub index_name: String,
    /// Total connection attempts before giving up.
    pub max_retries: u32,
    /// Fixed delay between connection attempts, in seconds.
    pub retry_delay_secs: u64,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Documents per bulk request.
    pub bulk_chunk_size: usize,
    /// Maximum hits returned by a query.
    pub result_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            username: "admin".to_string(),
            password: "admin".to_string(),
            use_ssl: false,
            verify_certs: false,
            index_name: "screenplays".to_string(),
            max_retries: 5,
            retry_delay_secs: 2,
            request_timeout_secs: 30,
            bulk_chunk_size: 500,
            result_limit: 10,
        }
    }
}

impl ClientConfig {
    /// Base URL of the engine, e.g. `http://localhost:9200`.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Delay between connection attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Timeout applied to each engine request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Copy with the password replaced, for display.
    pub fn masked(&self) -> Self {
        Self {
            password: "********".to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:9200");
        assert_eq!(config.index_name, "screenplays");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_with_ssl() {
        let config = ClientConfig {
            host: "search.internal".to_string(),
            port: 443,
            use_ssl: true,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://search.internal:443");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = from_json(r#"{"host": "db", "max_retries": 2}"#);
        assert_eq!(config.host, "db");
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.port, 9200);
    }

    #[test]
    fn test_masked_hides_password() {
        let masked = ClientConfig::default().masked();
        assert_eq!(masked.password, "********");
        assert_eq!(masked.username, "admin");
    }

    fn from_json(json: &str) -> ClientConfig {
        serde_json::from_str(json).unwrap()
    }
}
