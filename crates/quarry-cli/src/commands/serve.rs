//! `quarry serve` - run the MCP server.

use anyhow::{Context, Result};
use clap::Args;
use quarry_core::{QuarryConfig, Transport};
use quarry_mcp::McpServer;
use tracing::info;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Transport type: stdio or http (overrides mcp.transport)
    #[arg(long)]
    pub transport: Option<Transport>,

    /// HTTP bind host (overrides mcp.host)
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port (overrides mcp.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Connection URL (overrides database.url and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl ServeArgs {
    /// Fold the command-line overrides into `config`.
    fn apply(self, config: &mut QuarryConfig) {
        if let Some(transport) = self.transport {
            config.mcp.transport = transport;
        }
        if let Some(host) = self.host {
            config.mcp.host = host;
        }
        if let Some(port) = self.port {
            config.mcp.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
            config.database.url_env = None;
        }
    }
}

pub async fn execute(mut config: QuarryConfig, args: ServeArgs) -> Result<()> {
    args.apply(&mut config);

    let db = super::open_database(&config.database).await?;

    info!(
        transport = %config.mcp.transport,
        project = config.project.as_deref().unwrap_or("quarry"),
        "Starting MCP server"
    );
    if config.mcp.is_http() {
        info!(addr = %config.mcp.bind_address(), "HTTP transport selected");
    }

    let server = McpServer::new(config.mcp, db.clone(), config.guardrails)
        .context("Failed to build MCP server")?;
    let result = server.run().await.context("MCP server failed");

    db.close().await;
    result
}
