//! Offline introspection and one-shot requests.
//!
//! `quarry resources`, `quarry tools` and `quarry prompts` print what the server
//! advertises without touching the database. `quarry read`, `quarry call` and
//! `quarry prompt` build a server and push a single JSON-RPC request through
//! the same router the transports use.

use anyhow::{Context, Result};
use clap::Args;
use quarry_core::{QuarryConfig, ResourceId};
use quarry_mcp::protocol::{
    CallToolResponse, GetPromptResponse, PromptContent, ResourceContents, ToolContent,
};
use quarry_mcp::{JsonRpcRequest, McpServer, PromptKind, ResourceReader, ToolKind};
use serde_json::{Value, json};

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Print each tool's input schema
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Resource URI, e.g. db://schema/customers
    pub uri: String,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name
    pub tool: String,

    /// Tool arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Prompt name
    pub name: String,

    /// Prompt arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
}

pub fn resources() -> Result<()> {
    println!("\n📚 Resources ({}):", ResourceId::ALL.len());
    for id in ResourceId::ALL {
        let definition = ResourceReader::definition(id);
        println!("   • {} ({})", definition.uri, definition.name);
        println!("     {}", definition.description);
    }
    Ok(())
}

pub fn tools(args: ToolsArgs) -> Result<()> {
    println!("\n🔧 Available Tools ({}):", ToolKind::ALL.len());
    for kind in ToolKind::ALL {
        let definition = kind.definition();
        println!("   • {} (read)", definition.name);
        if let Some(description) = &definition.description {
            println!("     {}", description);
        }
        if args.verbose {
            println!(
                "     Schema: {}",
                serde_json::to_string_pretty(&definition.input_schema)?
            );
        }
    }
    Ok(())
}

pub fn prompts() -> Result<()> {
    println!("\n💬 Prompts ({}):", PromptKind::ALL.len());
    for kind in PromptKind::ALL {
        let definition = kind.definition();
        println!("   • {}", definition.name);
        println!("     {}", definition.description);
        for argument in &definition.arguments {
            let flag = if argument.required { "required" } else { "optional" };
            println!("       - {} ({}): {}", argument.name, flag, argument.description);
        }
    }
    Ok(())
}

pub async fn read(config: QuarryConfig, args: ReadArgs) -> Result<()> {
    let result = request(config, "resources/read", json!({ "uri": args.uri })).await?;

    let contents: Vec<ResourceContents> = serde_json::from_value(result["contents"].clone())
        .context("Unexpected resources/read result")?;
    for entry in contents {
        println!("{}", entry.text);
    }
    Ok(())
}

pub async fn call(config: QuarryConfig, args: CallArgs) -> Result<()> {
    let arguments = parse_object(&args.args)?;
    let result = request(
        config,
        "tools/call",
        json!({ "name": args.tool, "arguments": arguments }),
    )
    .await?;

    let response: CallToolResponse =
        serde_json::from_value(result).context("Unexpected tools/call result")?;
    for ToolContent::Text { text } in &response.content {
        println!("{}", text);
    }
    if response.is_error {
        anyhow::bail!("Tool {} reported an error", args.tool);
    }
    Ok(())
}

pub async fn prompt(config: QuarryConfig, args: PromptArgs) -> Result<()> {
    let arguments = parse_object(&args.args)?;
    let result = request(
        config,
        "prompts/get",
        json!({ "name": args.name, "arguments": arguments }),
    )
    .await?;

    let response: GetPromptResponse =
        serde_json::from_value(result).context("Unexpected prompts/get result")?;
    println!("📝 {}\n", response.description);
    for message in &response.messages {
        let PromptContent::Text { text } = &message.content;
        println!("[{}]\n{}", message.role, text);
    }
    Ok(())
}

/// Run one request against a freshly built server and return its `result`.
async fn request(config: QuarryConfig, method: &str, params: Value) -> Result<Value> {
    let db = super::open_database(&config.database).await?;
    let server = McpServer::new(config.mcp, db.clone(), config.guardrails)
        .context("Failed to build MCP server")?;

    let response = server
        .handle_request(JsonRpcRequest::new(1, method, Some(params)))
        .await;
    db.close().await;

    let response = response.context("Server sent no response")?;
    if let Some(error) = response.error {
        anyhow::bail!("{} (code {})", error.message, error.code);
    }
    Ok(response.result.unwrap_or(Value::Null))
}

fn parse_object(text: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(text).with_context(|| format!("Invalid --args JSON: {}", text))?;
    if !value.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }
    Ok(value)
}
