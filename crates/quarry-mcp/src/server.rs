//! MCP server implementation.
//!
//! This module provides the request router: it decodes JSON-RPC messages,
//! resolves tool, resource and prompt names through their registries, and
//! normalizes every failure into a JSON-RPC error envelope.

use crate::error::McpError;
use crate::executor::ToolExecutor;
use crate::http_transport::HttpServer;
use crate::prompts::{PromptKind, prompt_registry};
use crate::protocol::*;
use crate::registry::Registry;
use crate::resources::{ResourceReader, resource_registry};
use crate::tools::{ToolKind, tool_registry};
use quarry_adapter_sqlite::Database;
use quarry_core::config::mcp::{McpConfig, Transport};
use quarry_core::{GuardrailsConfig, ResourceId};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Name reported in `initialize` and by the health endpoint.
pub const SERVER_NAME: &str = "quarry-mcp";

/// The MCP server.
pub struct McpServer {
    config: McpConfig,
    tools: Registry<ToolKind>,
    resources: Registry<ResourceId>,
    prompts: Registry<PromptKind>,
    executor: ToolExecutor,
    reader: ResourceReader,
}

impl McpServer {
    /// Create a new MCP server over an open database.
    pub fn new(
        config: McpConfig,
        db: Database,
        guardrails: GuardrailsConfig,
    ) -> Result<Self, McpError> {
        let executor = ToolExecutor::new(db.clone(), guardrails)?;
        let server = Self {
            config,
            tools: tool_registry(),
            resources: resource_registry(),
            prompts: prompt_registry(),
            executor,
            reader: ResourceReader::new(db),
        };

        tracing::info!(
            tools = server.tools.len(),
            resources = server.resources.len(),
            prompts = server.prompts.len(),
            "MCP server ready"
        );

        Ok(server)
    }

    pub fn config(&self) -> &McpConfig {
        &self.config
    }

    /// Start the MCP server on the configured transport.
    pub async fn run(self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => Arc::new(self).run_http().await,
        }
    }

    /// Run the server with stdio transport until stdin closes.
    pub async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!("Starting MCP server with stdio transport");

        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve_lines(stdin, stdout).await?;

        tracing::info!("stdin closed, stopping MCP server");
        Ok(())
    }

    /// Run the server with HTTP transport until Ctrl-C.
    pub async fn run_http(self: Arc<Self>) -> Result<(), McpError> {
        let addr = self.config.bind_address();
        HttpServer::new(addr, self).run().await
    }

    /// Serve newline-delimited JSON-RPC frames from `input`, one at a time.
    pub async fn serve_lines<R, W>(&self, mut input: R, mut output: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.handle_message(line).await
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Received a line that is not valid UTF-8");
                    Some(JsonRpcResponse::error(
                        None,
                        codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ))
                }
            };

            if let Some(response) = response {
                write_frame(&mut output, &response).await?;
            }
        }
        Ok(())
    }

    /// Handle one raw JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, text: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    None,
                    codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    codes::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a decoded JSON-RPC request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                codes::INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        let notification = request.is_notification();
        let id = request.id;
        let method = request.method;
        tracing::debug!(method = %method, notification, "Handling request");

        let outcome = self.dispatch(&method, request.params).await;
        if notification {
            if let Err(err) = outcome {
                tracing::debug!(method = %method, error = %err, "Notification failed");
            }
            return None;
        }

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                tracing::debug!(method = %method, code = err.code(), error = %err, "Request failed");
                err.into_response(id)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        match method {
            "initialize" => Ok(self.handle_initialize()),
            "initialized" | "notifications/initialized" | "ping" => Ok(json!({})),
            "resources/list" => Ok(self.handle_list_resources()),
            "resources/read" => self.handle_read_resource(parse_params(params)?).await,
            "tools/list" => Ok(self.handle_list_tools()),
            "tools/call" => self.handle_call_tool(parse_params(params)?).await,
            "prompts/list" => Ok(self.handle_list_prompts()),
            "prompts/get" => self.handle_get_prompt(parse_params(params)?),
            "shutdown" => {
                tracing::info!("MCP server shutdown requested");
                Ok(Value::Null)
            }
            _ => Err(McpError::MethodNotFound {
                method: method.to_string(),
            }),
        }
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            "capabilities": self.capabilities(),
        })
    }

    /// Advertise only the capabilities that have something registered.
    fn capabilities(&self) -> Value {
        let mut capabilities = serde_json::Map::new();
        for (name, empty) in [
            ("resources", self.resources.is_empty()),
            ("tools", self.tools.is_empty()),
            ("prompts", self.prompts.is_empty()),
        ] {
            if !empty {
                capabilities.insert(name.to_string(), json!({}));
            }
        }
        Value::Object(capabilities)
    }

    fn handle_list_resources(&self) -> Value {
        let resources: Vec<_> = self
            .resources
            .list()
            .map(|id| ResourceReader::definition(*id))
            .collect();
        json!({ "resources": resources })
    }

    async fn handle_read_resource(&self, params: ReadResourceParams) -> Result<Value, McpError> {
        let id = self
            .resources
            .resolve(&params.uri)
            .ok_or(McpError::ResourceNotFound { uri: params.uri })?;

        let contents = self.reader.contents(id).await?;
        Ok(json!({ "contents": [contents] }))
    }

    fn handle_list_tools(&self) -> Value {
        let tools: Vec<_> = self.tools.list().map(ToolKind::definition).collect();
        json!({ "tools": tools })
    }

    async fn handle_call_tool(&self, params: CallToolParams) -> Result<Value, McpError> {
        let kind = self
            .tools
            .resolve(&params.name)
            .ok_or(McpError::ToolNotFound { name: params.name })?;

        tracing::info!(tool = %kind, "Tool call");
        let response = self.executor.call(kind, params.arguments).await?;
        Ok(serde_json::to_value(response)?)
    }

    fn handle_list_prompts(&self) -> Value {
        let prompts: Vec<_> = self.prompts.list().map(PromptKind::definition).collect();
        json!({ "prompts": prompts })
    }

    fn handle_get_prompt(&self, params: GetPromptParams) -> Result<Value, McpError> {
        let kind = self
            .prompts
            .resolve(&params.name)
            .ok_or(McpError::PromptNotFound { name: params.name })?;

        let rendered = kind.render(&params.arguments.unwrap_or_default());
        Ok(serde_json::to_value(rendered)?)
    }
}

async fn write_frame<W>(output: &mut W, response: &JsonRpcResponse) -> Result<(), McpError>
where
    W: AsyncWrite + Unpin,
{
    let mut frame = serde_json::to_vec(response)?;
    frame.push(b'\n');
    output.write_all(&frame).await?;
    output.flush().await?;
    Ok(())
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, McpError> {
    let params = params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}
