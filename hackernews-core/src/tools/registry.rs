//! Tool Registry for tool registration, lookup and MCP listing
//!
//! Tools are listed in registration order so `tools/list` is stable across
//! calls.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::tool::Tool;

/// Error type for registry operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// Tool with this name already exists
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    /// Tool not found
    #[error("Tool '{0}' not found")]
    NotFound(String),
}

/// Registry for managing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool
    ///
    /// Returns an error if a tool with the same name is already registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Register multiple tools at once
    ///
    /// Fails on the first duplicated name.
    pub fn register_all(&mut self, tools: Vec<Arc<dyn Tool>>) -> Result<(), RegistryError> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tools for MCP listing
    pub fn mcp_tools(&self) -> Vec<McpToolInfo> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| McpToolInfo {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.schema().parameters,
            })
            .collect()
    }

    /// Validate arguments against a tool's own validation rules
    pub fn validate_args(
        &self,
        tool_name: &str,
        args: &serde_json::Value,
    ) -> Result<(), super::ToolError> {
        let tool = self.get(tool_name).ok_or_else(|| {
            super::ToolError::new(
                super::ToolErrorKind::NotFound,
                RegistryError::NotFound(tool_name.to_string()).to_string(),
            )
        })?;

        tool.validate(args).map_err(super::ToolError::validation)
    }
}

/// Tool information for MCP listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolInfo {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,
}
