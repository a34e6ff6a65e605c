//! MCP Transport Implementations
//!
//! Transports handle the I/O for MCP communication.

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::warn;

use serde_json::Value;

use super::protocol::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
use crate::error::{HackerNewsError, Result};

/// Transport trait for MCP communication
#[async_trait]
pub trait Transport: Send {
    /// Receive the next message, `None` once the peer has closed the stream
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>>;

    /// Send a response through the transport
    async fn send(&mut self, response: JsonRpcResponse) -> Result<()>;
}

/// Newline-delimited JSON over any async reader/writer pair.
///
/// Lines that are not JSON are answered with a parse error (`-32700`), JSON
/// that is not a request with an invalid-request error (`-32600`). Both are
/// skipped; only I/O failures end the stream.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Stdio transport, as launched by desktop MCP clients
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    /// Create a new stdio transport
    pub fn stdio() -> Self {
        LineTransport::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back the writer, e.g. to inspect what was sent
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn write_line(&mut self, response: &JsonRpcResponse) -> Result<()> {
        let mut json = serde_json::to_string(response)?;
        json.push('\n');

        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| HackerNewsError::Transport(format!("Failed to write response: {}", e)))?;
        self.writer
            .flush()
            .await
            .map_err(|e| HackerNewsError::Transport(format!("Failed to flush output: {}", e)))
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        let mut line = String::new();

        loop {
            line.clear();
            let n = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|e| HackerNewsError::Transport(format!("Failed to read input: {}", e)))?;
            if n == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let value: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "discarding unparseable JSON-RPC message");
                    let response = JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error());
                    self.write_line(&response).await?;
                    continue;
                }
            };

            // Well-formed JSON that is not a request: answer with its id if one is readable
            let id = value
                .get("id")
                .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
                .unwrap_or(RequestId::Null);
            match serde_json::from_value::<JsonRpcRequest>(value) {
                Ok(request) if request.jsonrpc == JSONRPC_VERSION => return Ok(Some(request)),
                Ok(request) => {
                    warn!(version = %request.jsonrpc, "rejecting request with wrong jsonrpc version");
                    self.write_line(&JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
                        .await?;
                }
                Err(e) => {
                    warn!(error = %e, "rejecting malformed JSON-RPC request");
                    self.write_line(&JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
                        .await?;
                }
            }
        }
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        self.write_line(&response).await
    }
}

/// In-memory transport for testing
#[derive(Debug, Default)]
pub struct MemoryTransport {
    requests: VecDeque<JsonRpcRequest>,
    responses: Vec<JsonRpcResponse>,
}

impl MemoryTransport {
    /// Create a new memory transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request to be received
    pub fn push_request(&mut self, request: JsonRpcRequest) {
        self.requests.push_back(request);
    }

    /// Get all sent responses
    pub fn responses(&self) -> &[JsonRpcResponse] {
        &self.responses
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn receive(&mut self) -> Result<Option<JsonRpcRequest>> {
        Ok(self.requests.pop_front())
    }

    async fn send(&mut self, response: JsonRpcResponse) -> Result<()> {
        self.responses.push(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport() {
        let mut transport = MemoryTransport::new();
        transport.push_request(JsonRpcRequest::new(1i64, "tools/list"));

        let request = transport.receive().await.unwrap();
        assert_eq!(request.unwrap().method, "tools/list");

        let response = JsonRpcResponse::success(RequestId::Number(1), serde_json::json!({}));
        transport.send(response).await.unwrap();
        assert_eq!(transport.responses().len(), 1);

        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_line_transport_skips_blank_and_garbage() {
        let input: &[u8] = b"\n  \nnot json\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";
        let mut transport = LineTransport::new(input, Vec::new());

        let request = transport.receive().await.unwrap().unwrap();
        assert_eq!(request.id, Some(RequestId::Number(7)));
        assert!(transport.receive().await.unwrap().is_none());

        let written = String::from_utf8(transport.into_writer()).unwrap();
        let parse_error: JsonRpcResponse = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(parse_error.id, RequestId::Null);
        assert_eq!(parse_error.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_line_transport_rejects_invalid_requests() {
        let input: &[u8] = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":3}\n",
            "{\"id\":\"x\",\"method\":\"ping\"}\n",
            "{\"jsonrpc\":\"1.0\",\"id\":4,\"method\":\"ping\"}\n",
            "[1,2]\n",
        )
        .as_bytes();
        let mut transport = LineTransport::new(input, Vec::new());
        assert!(transport.receive().await.unwrap().is_none());

        let written = String::from_utf8(transport.into_writer()).unwrap();
        let responses: Vec<JsonRpcResponse> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 4);
        for response in &responses {
            assert_eq!(response.error.as_ref().unwrap().code, -32600);
        }
        assert_eq!(responses[0].id, RequestId::Number(3));
        assert_eq!(responses[1].id, RequestId::String("x".to_string()));
        assert_eq!(responses[2].id, RequestId::Number(4));
        assert_eq!(responses[3].id, RequestId::Null);
    }
}
