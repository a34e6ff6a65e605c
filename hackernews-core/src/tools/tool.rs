//! Tool trait and metadata definitions
//!
//! Each tool declares its name, description, input schema, validation and
//! execution logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::result::{ToolError, ValidationError};

/// Tool metadata for LLM-friendly discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool name (unique identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Tags for categorization
    pub tags: Vec<String>,
}

impl ToolMetadata {
    /// Create new metadata with required fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// JSON Schema for input parameters
    pub parameters: Value,
}

impl ToolSchema {
    /// Create a schema from a JSON Schema value
    pub fn new(parameters: Value) -> Self {
        Self { parameters }
    }
}

/// Core tool trait
///
/// The server calls `validate` first and only calls `execute` when it passes.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata
    fn metadata(&self) -> &ToolMetadata;

    /// Get tool name (convenience method)
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Get tool description (convenience method)
    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Get the JSON schema for this tool's parameters
    fn schema(&self) -> ToolSchema;

    /// Validate input arguments before execution
    ///
    /// Default implementation performs no validation.
    fn validate(&self, _args: &Value) -> Result<(), Vec<ValidationError>> {
        Ok(())
    }

    /// Execute the tool with given arguments
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}
