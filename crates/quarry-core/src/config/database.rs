//! Database connection configuration.
//!
//! The connection URL is resolved in order of precedence:
//! 1. the environment variable named by `url_env` (`DATABASE_URL` by default)
//! 2. `url` from the config file
//! 3. the built-in default, a SQLite file under `data/`

use serde::{Deserialize, Serialize};

/// Environment variable that turns on statement echo regardless of `echo`.
pub const ECHO_ENV: &str = "DB_ECHO";

/// Configuration for the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Environment variable name containing the connection URL.
    /// Highest precedence.
    #[serde(default = "default_url_env", skip_serializing_if = "Option::is_none")]
    pub url_env: Option<String>,

    /// Connection URL, e.g. `sqlite://data/quarry.db` or `sqlite::memory:`.
    #[serde(default = "default_url")]
    pub url: String,

    /// Log every executed statement.
    #[serde(default)]
    pub echo: bool,

    /// Create the database file (and its parent directory) when missing.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Connection pool configuration.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            url: default_url(),
            echo: false,
            create_if_missing: true,
            pool: PoolConfig::default(),
        }
    }
}

/// Connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout in seconds when acquiring a connection.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Ping connections before handing them out.
    #[serde(default = "default_true")]
    pub test_before_acquire: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            test_before_acquire: true,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection URL.
    pub fn connection_string(&self) -> String {
        if let Some(env_var) = &self.url_env
            && let Ok(url) = std::env::var(env_var)
            && !url.trim().is_empty()
        {
            return url;
        }
        self.url.clone()
    }

    /// Whether statements should be echoed, from the config flag or `DB_ECHO=true`.
    pub fn echo_enabled(&self) -> bool {
        self.echo
            || std::env::var(ECHO_ENV)
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
    }
}

/// Whether a SQLite URL points at a private in-memory database.
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn default_url_env() -> Option<String> {
    Some("DATABASE_URL".to_string())
}

fn default_url() -> String {
    "sqlite://data/quarry.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}
