//! Configuration types for Quarry.
//!
//! Configuration is loaded from a single YAML file (`quarry.yaml` by default).
//! Every section is optional; missing sections fall back to their defaults.
//!
//! ```yaml
//! project: quarry
//! database:
//!   url: sqlite://data/quarry.db
//! mcp:
//!   transport: http
//!   port: 3000
//! guardrails:
//!   default_query_limit: 100
//!   query_timeout_seconds: 30
//! logging:
//!   level: info
//!   format: json
//! ```

pub mod database;
pub mod mcp;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use database::{DatabaseConfig, PoolConfig};
pub use mcp::{McpConfig, Transport};

use crate::MAX_QUERY_LIMIT;

/// Complete Quarry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuarryConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Relational store connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Limits applied to ad-hoc queries.
    #[serde(default)]
    pub guardrails: GuardrailsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Limits applied to the ad-hoc query tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    /// Rows returned when the caller does not pass `limit`.
    #[serde(default = "default_query_limit")]
    pub default_query_limit: u32,

    /// Wall-clock budget for one ad-hoc query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_seconds: u64,
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            default_query_limit: default_query_limit(),
            query_timeout_seconds: default_query_timeout(),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_query_limit() -> u32 {
    100
}

fn default_query_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuarryConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the gateway cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.guardrails.default_query_limit;
        if limit == 0 || limit > MAX_QUERY_LIMIT {
            return Err(ConfigError::Config(format!(
                "guardrails.default_query_limit must be between 1 and {}, got {}",
                MAX_QUERY_LIMIT, limit
            )));
        }
        if self.guardrails.query_timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "guardrails.query_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.database.pool.max_connections == 0 {
            return Err(ConfigError::Config(
                "database.pool.max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
