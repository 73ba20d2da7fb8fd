//! CLI command implementations for Quarry.

pub mod db;
pub mod inspect;
pub mod serve;

use anyhow::{Context, Result};
use quarry_adapter_sqlite::Database;
use quarry_core::{DatabaseConfig, LogFormat, LoggingConfig, QuarryConfig};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Load the configuration file. A missing file yields the defaults and `false`.
pub fn load_config(path: &Path) -> Result<(QuarryConfig, bool)> {
    if !path.exists() {
        return Ok((QuarryConfig::default(), false));
    }
    let config = QuarryConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok((config, true))
}

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// the stdio transport.
pub fn init_tracing(logging: &LoggingConfig, echo: bool) -> Result<()> {
    let mut filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level: {}", logging.level))?,
    };
    if echo {
        filter = filter.add_directive("sqlx::query=debug".parse()?);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

/// Connect and make sure the schema exists.
pub async fn open_database(config: &DatabaseConfig) -> Result<Database> {
    let db = Database::connect(config)
        .await
        .context("Failed to connect to database")?;
    db.bootstrap().await.context("Failed to create schema")?;
    Ok(db)
}
