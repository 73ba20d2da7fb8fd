//! Error types for the MCP crate.

use crate::protocol::{JsonRpcResponse, codes};
use quarry_adapter_sqlite::StoreError;
use serde_json::{Value, json};
use thiserror::Error;

/// Protocol-level failures. Each maps to a JSON-RPC error response.
///
/// Failures inside a tool handler are not represented here; they travel back to
/// the caller as tool payloads (see [`crate::executor::ToolFault`]).
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Unknown JSON-RPC method.
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// Missing or malformed request params.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unknown resource URI.
    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    /// Unknown tool name.
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    /// Unknown prompt name.
    #[error("Prompt not found: {name}")]
    PromptNotFound { name: String },

    /// No database session could be acquired.
    #[error("Database unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// A resource could not be computed from the store.
    #[error("{0}")]
    Store(#[source] StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<StoreError> for McpError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            McpError::StoreUnavailable(err)
        } else {
            McpError::Store(err)
        }
    }
}

impl McpError {
    /// JSON-RPC error code.
    pub fn code(&self) -> i32 {
        match self {
            McpError::MethodNotFound { .. } => codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_)
            | McpError::ToolNotFound { .. }
            | McpError::PromptNotFound { .. } => codes::INVALID_PARAMS,
            McpError::ResourceNotFound { .. } => codes::RESOURCE_NOT_FOUND,
            McpError::StartupFailed(_)
            | McpError::SerializationError(_)
            | McpError::StoreUnavailable(_)
            | McpError::Store(_)
            | McpError::IoError(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Structured `data` naming the offending identifier, when there is one.
    pub fn data(&self) -> Option<Value> {
        match self {
            McpError::MethodNotFound { method } => Some(json!({ "method": method })),
            McpError::ResourceNotFound { uri } => Some(json!({ "uri": uri })),
            McpError::ToolNotFound { name } => Some(json!({ "tool": name })),
            McpError::PromptNotFound { name } => Some(json!({ "prompt": name })),
            _ => None,
        }
    }

    /// Convert into a JSON-RPC error response for request `id`.
    pub fn into_response(self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::error_with_data(id, self.code(), self.to_string(), self.data())
    }
}
