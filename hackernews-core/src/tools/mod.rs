//! Tool system exposed over MCP
//!
//! - [`Tool`]: metadata, JSON schema, validation and execution
//! - [`ToolRegistry`]: registration with duplicate detection and MCP listing
//! - [`hackernews`]: the Hacker News item and story-list tools

pub mod hackernews;
mod registry;
mod result;
mod tool;

pub use hackernews::{
    DEFAULT_STORY_LIMIT, GetItemTool, SharedFetcher, StoryListTool, hacker_news_registry,
    register_hacker_news_tools,
};
pub use registry::{McpToolInfo, RegistryError, ToolRegistry};
pub use result::{ToolError, ToolErrorKind, ValidationError};
pub use tool::{Tool, ToolMetadata, ToolSchema};
