//! MCP Server Implementation
//!
//! Handles MCP requests and dispatches tool calls to the registry.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

use super::protocol::*;
use super::transport::{StdioTransport, Transport};
use crate::config::ServerConfig;
use crate::tools::ToolRegistry;

/// MCP Server configuration
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// Usage notes sent to the client on `initialize`
    pub instructions: Option<String>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for McpServerConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            version: config.version.clone(),
            instructions: None,
        }
    }
}

/// MCP Server state
pub struct McpServer {
    config: McpServerConfig,
    tools: ToolRegistry,
    initialized: AtomicBool,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("config", &self.config)
            .field("tools", &self.tools)
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl McpServer {
    /// Create a new MCP server builder
    pub fn builder() -> McpServerBuilder {
        McpServerBuilder::new()
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    /// Get a reference to the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Whether a client has completed `initialize`
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle an incoming JSON-RPC message.
    ///
    /// Returns `None` for notifications, which must not be answered.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        debug!(method = %request.method, "handling request");
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, Value::Object(Default::default())),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found()),
        };
        Some(response)
    }

    fn handle_notification(&self, notification: &JsonRpcRequest) {
        match notification.method.as_str() {
            "notifications/initialized" => {
                self.initialized.store(true, Ordering::SeqCst);
                info!("client initialized");
            }
            other => debug!(method = other, "ignoring notification"),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing initialize params"),
                );
            }
        };

        info!(
            client = %params.client_info.name,
            client_version = %params.client_info.version,
            requested_protocol = %params.protocol_version,
            "initialize"
        );

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
            instructions: self.config.instructions.clone(),
        };

        self.initialized.store(true, Ordering::SeqCst);
        to_response(id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: RequestId) -> JsonRpcResponse {
        let tools = self
            .tools
            .mcp_tools()
            .into_iter()
            .map(|t| McpTool {
                name: t.name,
                description: t.description,
                input_schema: t.input_schema,
                annotations: Some(ToolAnnotations {
                    read_only_hint: Some(true),
                    open_world_hint: Some(true),
                }),
            })
            .collect();

        to_response(id, &ToolsListResult { tools })
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: RequestId, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid tool call params: {}", e)),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing tool call params"),
                );
            }
        };

        let Some(tool) = self.tools.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            );
        };

        // Bad input never reaches the network
        if let Err(e) = self.tools.validate_args(&params.name, &params.arguments) {
            debug!(tool = %params.name, error = %e, "rejected tool arguments");
            return to_response(id, &ToolCallResult::error(e.message));
        }

        let result = match tool.execute(params.arguments).await {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => ToolCallResult::text(text),
                Err(e) => ToolCallResult::error(format!("Error: {}", e)),
            },
            Err(e) if e.is_validation() => ToolCallResult::error(e.message),
            Err(e) => {
                error!(tool = %params.name, error = %e, "tool call failed");
                ToolCallResult::error(format!("Error: {}", e.message))
            }
        };

        to_response(id, &result)
    }

    /// Serve requests until the transport reaches end of input
    pub async fn run<T: Transport>(&self, transport: &mut T) -> crate::error::Result<()> {
        info!(name = %self.config.name, tools = self.tools.len(), "MCP server running");
        loop {
            match transport.receive().await {
                Ok(Some(request)) => {
                    if let Some(response) = self.handle_request(request).await {
                        transport.send(response).await?;
                    }
                }
                Ok(None) => {
                    info!("input closed, shutting down");
                    break;
                }
                Err(e) => {
                    error!("Transport error: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl McpServer {
    /// Serve over stdin/stdout until stdin closes
    pub async fn run_stdio(&self) -> crate::error::Result<()> {
        let mut transport = StdioTransport::stdio();
        self.run(&mut transport).await
    }
}

fn to_response<T: serde::Serialize>(id: RequestId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}

/// Builder for MCP Server
pub struct McpServerBuilder {
    config: McpServerConfig,
    tools: ToolRegistry,
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self {
            config: McpServerConfig::default(),
            tools: ToolRegistry::new(),
        }
    }

    pub fn config(mut self, config: McpServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn with_tools(mut self, registry: ToolRegistry) -> Self {
        self.tools = registry;
        self
    }

    pub fn build(self) -> McpServer {
        McpServer {
            config: self.config,
            tools: self.tools,
            initialized: AtomicBool::new(false),
        }
    }
}

impl Default for McpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
