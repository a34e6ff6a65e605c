//! Error types for Hacker News operations

use std::time::Duration;

/// Result type for Hacker News operations
pub type Result<T> = std::result::Result<T, HackerNewsError>;

/// Error types for the Hacker News client, fetcher and server
#[derive(Debug, thiserror::Error)]
pub enum HackerNewsError {
    /// Transport-level failure before a response was obtained
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timeout after {}ms: {url}", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status}: {reason} ({url})")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// MCP transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HackerNewsError {
    /// Whether the failure happened before any usable response arrived
    pub fn is_transient(&self) -> bool {
        matches!(self, HackerNewsError::Http(_) | HackerNewsError::Timeout { .. })
    }

    /// HTTP status code, when the upstream answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            HackerNewsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
