//! Shared test infrastructure for Quarry MCP end-to-end tests.
//!
//! This module provides:
//! - An in-memory SQLite store with the schema and a fixed fixture dataset
//! - A router wired to that store
//! - Helper functions for calling the router and unpacking results

use quarry_adapter_sqlite::Database;
use quarry_core::{DatabaseConfig, GuardrailsConfig, McpConfig};
use quarry_mcp::protocol::{JsonRpcRequest, JsonRpcResponse, ToolContent};
use quarry_mcp::{CallToolResponse, McpServer};
use serde_json::{Value, json};

// =============================================================================
// DATABASE INITIALIZATION
// =============================================================================

const SEED_SQL: &str = include_str!("../fixtures/seed.sql");

pub async fn initialize_database(db: &Database) -> Result<(), String> {
    db.bootstrap()
        .await
        .map_err(|e| format!("Failed to create schema: {}", e))?;
    db.with_session(|s| Box::pin(async move { s.run_script(SEED_SQL).await }))
        .await
        .map_err(|e| format!("Failed to load fixtures: {}", e))?;
    println!("✅ Database initialized with schema and seed data");
    Ok(())
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub db: Database,
    pub server: McpServer,
}

impl TestContext {
    pub async fn setup() -> Result<Self, String> {
        let config = DatabaseConfig {
            url_env: None,
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let db = Database::connect(&config)
            .await
            .map_err(|e| format!("Failed to open database: {}", e))?;
        initialize_database(&db).await?;

        let server = McpServer::new(McpConfig::default(), db.clone(), GuardrailsConfig::default())
            .map_err(|e| format!("Failed to create server: {}", e))?;

        Ok(Self { db, server })
    }

    /// Send a request and return its response.
    pub async fn rpc(&self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.server
            .handle_request(JsonRpcRequest::new(1, method, params))
            .await
            .expect("requests with an id always get a response")
    }

    /// Send a request that must succeed and return its result.
    pub async fn rpc_ok(&self, method: &str, params: Option<Value>) -> Value {
        let response = self.rpc(method, params).await;
        assert!(response.error.is_none(), "{} failed: {:?}", method, response.error);
        response.result.expect("success response carries a result")
    }

    /// Call a tool and return its decoded payload plus the `isError` flag.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> (Value, bool) {
        let result = self
            .rpc_ok("tools/call", Some(json!({ "name": name, "arguments": arguments })))
            .await;
        let response: CallToolResponse =
            serde_json::from_value(result).expect("tools/call result shape");
        (tool_payload(&response), response.is_error)
    }

    /// Read a resource and decode its JSON document.
    pub async fn read_resource(&self, uri: &str) -> Value {
        let result = self
            .rpc_ok("resources/read", Some(json!({ "uri": uri })))
            .await;
        assert_eq!(result["contents"][0]["uri"], uri);
        assert_eq!(result["contents"][0]["mimeType"], "application/json");
        let text = result["contents"][0]["text"]
            .as_str()
            .expect("resource text");
        serde_json::from_str(text).expect("resource text is JSON")
    }
}

// =============================================================================
// RESULT HELPERS
// =============================================================================

/// Decode the JSON document carried in a tool result.
pub fn tool_payload(response: &CallToolResponse) -> Value {
    match response.content.first() {
        Some(ToolContent::Text { text }) => serde_json::from_str(text).expect("tool text is JSON"),
        None => panic!("tool result has no content"),
    }
}

/// Assert a tool call failed with an `{error, tool}` payload mentioning `needle`.
pub fn assert_tool_error(payload: &Value, is_error: bool, tool: &str, needle: &str) {
    assert!(is_error, "expected isError for {}: {}", tool, payload);
    assert_eq!(payload["tool"], tool);
    let message = payload["error"].as_str().expect("error message");
    assert!(
        message.contains(needle),
        "error {:?} should mention {:?}",
        message,
        needle
    );
}

/// Assert a protocol error code.
pub fn assert_rpc_error(response: &JsonRpcResponse, code: i32) {
    let error = response
        .error
        .as_ref()
        .unwrap_or_else(|| panic!("expected error {}, got {:?}", code, response.result));
    assert_eq!(error.code, code, "unexpected error: {}", error.message);
}

pub fn approx_eq(actual: &Value, expected: f64) -> bool {
    actual
        .as_f64()
        .is_some_and(|value| (value - expected).abs() < 1e-6)
}
