//! # hackernews-core
//!
//! A Model Context Protocol server that gives LLM clients read-only access
//! to the public Hacker News Firebase API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hackernews_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HackerNewsConfig::load()?;
//!     let server = hackernews_core::build_server(&config)?;
//!     server.run_stdio().await
//! }
//! ```
//!
//! ## Architecture
//!
//! - **client**: typed HTTP access to item and story-list endpoints
//! - **batch**: bounded-concurrency fan-out of item lookups
//! - **tools**: the `hn_*` tools, their argument validation and registry
//! - **mcp**: JSON-RPC 2.0 dispatch and the stdio transport

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod tools;

use std::sync::Arc;

use crate::batch::BatchFetcher;
use crate::client::HackerNewsClient;
use crate::config::HackerNewsConfig;
use crate::error::{HackerNewsError, Result};
use crate::mcp::{McpServer, McpServerConfig};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire a client, fetcher and tool registry into a ready-to-run server
pub fn build_server(config: &HackerNewsConfig) -> Result<McpServer> {
    let client = HackerNewsClient::new(&config.client)?;
    let fetcher = Arc::new(BatchFetcher::from_config(client, &config.batch));
    let registry = tools::hacker_news_registry(fetcher)
        .map_err(|e| HackerNewsError::Configuration(e.to_string()))?;

    Ok(McpServer::builder()
        .config(McpServerConfig::from(&config.server))
        .with_tools(registry)
        .build())
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::{AdmissionGate, BatchFetcher};
    pub use crate::client::{HackerNewsClient, Item, ItemId, ItemSource, ItemType, StoryCategory};
    pub use crate::config::{BatchConfig, ClientConfig, HackerNewsConfig, ServerConfig};
    pub use crate::error::{HackerNewsError, Result};
    pub use crate::mcp::{
        ContentBlock, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, McpServerBuilder,
        McpServerConfig, McpTool, RequestId, StdioTransport, ToolCallResult, Transport,
    };
    pub use crate::tools::{
        McpToolInfo, RegistryError, SharedFetcher, Tool, ToolError, ToolErrorKind, ToolMetadata,
        ToolRegistry, ToolSchema, ValidationError, hacker_news_registry,
    };
}
