//! Error types for scriptsearch-client transports.
//!
//! These are raw transport failures. [`SearchGateway`](crate::SearchGateway)
//! converts them into the system taxonomy in `scriptsearch_core::Error`;
//! they never cross the gateway boundary.

use thiserror::Error;

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the search engine
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The engine answered with an unexpected status
    #[error("Engine returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Response body could not be decoded
    #[error("Invalid engine response: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured endpoint is not a usable base URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// The transport is deliberately unreachable (in-memory transport)
    #[error("Engine unreachable: {0}")]
    Unreachable(String),
}

impl Error {
    /// Returns `true` if the underlying request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = Error::Status {
            status: 400,
            body: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "Engine returned status 400: bad");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_invalid_url_display() {
        let err = Error::InvalidUrl("nope".to_string());
        assert_eq!(err.to_string(), "Invalid endpoint URL: nope");
    }
}
