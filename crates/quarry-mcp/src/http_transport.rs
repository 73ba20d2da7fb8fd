//! HTTP transport for MCP server.
//!
//! JSON-RPC messages are POSTed to `/mcp`, one per request. Notifications are
//! acknowledged with `202 Accepted` and an empty body.

use crate::error::McpError;
use crate::server::{McpServer, SERVER_NAME};
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for MCP.
pub fn create_router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %uuid::Uuid::new_v4(),
                )
            }),
        )
        .with_state(server)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    server: Arc<McpServer>,
}

impl HttpServer {
    /// Create a new HTTP server bound to `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, server: Arc<McpServer>) -> Self {
        Self {
            addr: addr.into(),
            server,
        }
    }

    /// Run the HTTP server until Ctrl-C.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.server);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.addr, e))
            })?;

        tracing::info!(addr = %self.addr, "MCP HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("MCP HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
