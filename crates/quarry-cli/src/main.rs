use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::db::{InitArgs, SeedArgs};
use commands::inspect::{CallArgs, PromptArgs, ReadArgs, ToolsArgs};
use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "quarry", version, about = "Quarry MCP database gateway")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "QUARRY_CONFIG", default_value = "quarry.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server over stdio or HTTP.
    Serve(ServeArgs),

    /// Create the schema, optionally dropping existing tables first.
    Init(InitArgs),

    /// Fill the store with generated sample data.
    Seed(SeedArgs),

    /// List the resources the server advertises.
    Resources,

    /// List the tools the server advertises.
    Tools(ToolsArgs),

    /// List the prompt templates the server advertises.
    Prompts,

    /// Read one resource by URI.
    Read(ReadArgs),

    /// Call a tool once and print its result.
    Call(CallArgs),

    /// Render a prompt template.
    Prompt(PromptArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, found) = commands::load_config(&cli.config)?;
    commands::init_tracing(&config.logging, config.database.echo_enabled())?;
    if !found {
        tracing::warn!(config = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.cmd {
        Command::Serve(args) => commands::serve::execute(config, args).await,
        Command::Init(args) => commands::db::init(config, args).await,
        Command::Seed(args) => commands::db::seed(config, args).await,
        Command::Resources => commands::inspect::resources(),
        Command::Tools(args) => commands::inspect::tools(args),
        Command::Prompts => commands::inspect::prompts(),
        Command::Read(args) => commands::inspect::read(config, args).await,
        Command::Call(args) => commands::inspect::call(config, args).await,
        Command::Prompt(args) => commands::inspect::prompt(config, args).await,
    }
}
