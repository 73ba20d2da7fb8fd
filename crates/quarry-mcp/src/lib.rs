//! # quarry-mcp
//!
//! MCP (Model Context Protocol) server for the Quarry database gateway.
//!
//! The server lets an AI client discover and run a small, fixed set of read-only
//! operations against the e-commerce store:
//!
//! - **Resources**: table schema documents and a live statistics summary
//! - **Tools**: a guarded ad-hoc `SELECT`, customer order lookup, product sales ranking
//! - **Prompts**: analysis workflows that chain the tools above
//! - **Transports**: newline-delimited stdio and HTTP
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ JSON-RPC (resources / tools / prompts)
//!       ▼
//! ┌──────────────────────┐
//! │  Quarry MCP Server   │
//! │  1. Resolve name     │  ← Registry<ToolKind | ResourceId | PromptKind>
//! │  2. Check arguments  │  ← input JSON Schema
//! │  3. Gate ad-hoc SQL  │  ← validator
//! │  4. Read in session  │  ← quarry-adapter-sqlite
//! │  5. Return JSON      │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!          SQLite
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use quarry_adapter_sqlite::Database;
//! use quarry_core::QuarryConfig;
//! use quarry_mcp::McpServer;
//!
//! let config = QuarryConfig::from_file("quarry.yaml")?;
//! let db = Database::connect(&config.database).await?;
//! db.bootstrap().await?;
//!
//! let server = McpServer::new(config.mcp, db.clone(), config.guardrails)?;
//! server.run().await?;
//! db.close().await;
//! ```

pub mod error;
pub mod executor;
pub mod http_transport;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod server;
pub mod tools;
pub mod validator;

// Re-export main types
pub use error::McpError;
pub use executor::{ToolExecutor, ToolFault};
pub use http_transport::HttpServer;
pub use prompts::PromptKind;
pub use protocol::{
    CallToolParams, CallToolResponse, GetPromptResponse, JsonRpcRequest, JsonRpcResponse,
    ToolAnnotations, ToolContent, ToolDefinition,
};
pub use registry::Registry;
pub use resources::{ResourceReader, StatsSummary};
pub use server::McpServer;
pub use tools::ToolKind;
pub use validator::{Rejection, Verdict, validate};
