//! Tool error model
//!
//! Errors carry a kind from a small taxonomy so the protocol layer can tell
//! bad input apart from upstream trouble.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HackerNewsError;

/// Structured tool error with taxonomy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Error kind
    pub kind: ToolErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ToolError {
    /// Create a new tool error
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Create a validation error from field errors
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        Self {
            kind: ToolErrorKind::Validation,
            message: format!(
                "Validation failed: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
            context: Some(serde_json::to_value(&errors).unwrap_or_default()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ToolErrorKind::Validation
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<HackerNewsError> for ToolError {
    fn from(err: HackerNewsError) -> Self {
        let kind = match &err {
            HackerNewsError::Timeout { .. } => ToolErrorKind::Timeout,
            HackerNewsError::Http(_) => ToolErrorKind::Upstream,
            HackerNewsError::Status { status: 404, .. } => ToolErrorKind::NotFound,
            HackerNewsError::Status { .. } => ToolErrorKind::Upstream,
            HackerNewsError::Decode { .. } => ToolErrorKind::InvalidResponse,
            _ => ToolErrorKind::Internal,
        };
        ToolError::new(kind, err.to_string())
    }
}

/// Error kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Input validation failed; nothing was sent upstream
    Validation,

    /// Upstream reported the resource missing
    NotFound,

    /// Network failure or non-2xx answer from upstream
    Upstream,

    /// Upstream answered with an unexpected body
    InvalidResponse,

    /// Request exceeded its deadline
    Timeout,

    /// Bug or misconfiguration on our side
    Internal,
}

impl ToolErrorKind {
    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ToolErrorKind::Timeout | ToolErrorKind::Upstream | ToolErrorKind::InvalidResponse
        )
    }
}

/// Validation error for a specific argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Argument name (e.g., "limit")
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validation_error_message() {
        let error = ToolError::validation(vec![
            ValidationError::new("limit", "must be between 1 and 500, got 0"),
        ]);

        assert!(error.is_validation());
        assert_eq!(
            error.message,
            "Validation failed: limit: must be between 1 and 500, got 0"
        );
        assert!(error.context.is_some());
        assert!(!error.kind.is_retryable());
    }

    #[test]
    fn test_from_client_errors() {
        let timeout: ToolError = HackerNewsError::Timeout {
            url: "u".to_string(),
            timeout: Duration::from_secs(1),
        }
        .into();
        assert_eq!(timeout.kind, ToolErrorKind::Timeout);
        assert!(timeout.kind.is_retryable());

        let status: ToolError = HackerNewsError::Status {
            url: "u".to_string(),
            status: 502,
            reason: "Bad Gateway".to_string(),
        }
        .into();
        assert_eq!(status.kind, ToolErrorKind::Upstream);
        assert!(status.message.contains("HTTP 502"));

        let config: ToolError = HackerNewsError::Configuration("x".to_string()).into();
        assert_eq!(config.kind, ToolErrorKind::Internal);
    }
}
