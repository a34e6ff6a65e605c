//! Model Context Protocol (MCP) Server
//!
//! Exposes the Hacker News tools to MCP clients over newline-delimited
//! JSON-RPC 2.0 on stdio.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hackernews_core::batch::BatchFetcher;
//! use hackernews_core::client::HackerNewsClient;
//! use hackernews_core::mcp::McpServer;
//! use hackernews_core::tools::hacker_news_registry;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Arc::new(BatchFetcher::new(HackerNewsClient::with_defaults()?, 10));
//! let server = McpServer::builder()
//!     .name("hacker-news")
//!     .with_tools(hacker_news_registry(fetcher)?)
//!     .build();
//!
//! server.run_stdio().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Protocol Overview
//!
//! - `initialize` - Connection setup, advertises the `tools` capability
//! - `ping` - Liveness check
//! - `tools/list` - List available tools
//! - `tools/call` - Call a tool
//!
//! Notifications (messages without `id`) are consumed silently.

mod protocol;
mod server;
mod transport;

pub use protocol::*;
pub use server::{McpServer, McpServerBuilder, McpServerConfig};
pub use transport::{LineTransport, MemoryTransport, StdioTransport, Transport};
