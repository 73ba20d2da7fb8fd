//! Connection pool and scoped sessions.

use crate::error::StoreError;
use crate::value::{JsonRow, QueryRows, SqlParam, bind_params, column_names, row_to_json};
use futures::TryStreamExt;
use futures::future::BoxFuture;
use quarry_core::Table;
use quarry_core::config::database::{DatabaseConfig, is_in_memory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Row, Sqlite, SqlitePool, Transaction};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Process-wide handle to the store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.connection_string();
        let in_memory = is_in_memory(&url);

        let mut options = SqliteConnectOptions::from_str(&url)
            .map_err(StoreError::Acquire)?
            .foreign_keys(true)
            .create_if_missing(config.create_if_missing);
        if !config.echo_enabled() {
            options = options.disable_statement_logging();
        }
        if config.create_if_missing && !in_memory {
            ensure_parent_dir(options.get_filename())?;
        }

        let pool_config = &config.pool;
        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(pool_config.acquire_timeout_seconds))
            .test_before_acquire(pool_config.test_before_acquire);
        pool_options = if in_memory {
            // Every connection to :memory: opens its own database, so pin exactly one.
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options
                .max_connections(pool_config.max_connections)
                .idle_timeout(Duration::from_secs(pool_config.idle_timeout_seconds))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Acquire)?;

        tracing::info!(url = %url, in_memory, "Connected to database");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    /// Run `operation` inside a transaction.
    ///
    /// Commits when the operation returns `Ok`. On `Err` the transaction is rolled
    /// back and the operation's own error is returned. The connection goes back to
    /// the pool on every path, including when the returned future is dropped.
    pub async fn with_session<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, E>>,
        E: From<StoreError>,
    {
        let tx = self.pool.begin().await.map_err(StoreError::Acquire)?;
        let mut session = Session { tx };

        match operation(&mut session).await {
            Ok(value) => {
                session.tx.commit().await.map_err(StoreError::Commit)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = session.tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Session rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Row count of every table, in catalog order.
    pub async fn record_counts(&self) -> Result<Vec<(Table, i64)>, StoreError> {
        self.with_session(|session| {
            Box::pin(async move {
                let mut counts = Vec::with_capacity(Table::ALL.len());
                for table in Table::ALL {
                    counts.push((table, session.count_rows(table).await?));
                }
                Ok::<_, StoreError>(counts)
            })
        })
        .await
    }
}

/// A transaction-scoped handle, only reachable inside [`Database::with_session`].
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    /// Run a read statement and decode every row.
    pub async fn execute(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<QueryRows, StoreError> {
        tracing::debug!(sql, params = params.len(), "Executing query");

        let rows = bind_params(sql, params)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(StoreError::Query)?;

        let columns = rows.first().map(column_names).unwrap_or_default();
        let rows = rows.iter().map(row_to_json).collect::<Result<Vec<_>, _>>()?;
        Ok(QueryRows { columns, rows })
    }

    /// Run a read statement, stepping the cursor no further than `limit` rows.
    pub async fn fetch_limited(
        &mut self,
        sql: &str,
        params: &[SqlParam],
        limit: usize,
    ) -> Result<QueryRows, StoreError> {
        tracing::debug!(sql, limit, "Executing limited query");

        let mut stream = bind_params(sql, params).fetch(&mut *self.tx);
        let mut result = QueryRows::default();

        while result.rows.len() < limit {
            let Some(row) = stream.try_next().await.map_err(StoreError::Query)? else {
                break;
            };
            if result.columns.is_empty() {
                result.columns = column_names(&row);
            }
            result.rows.push(row_to_json(&row)?);
        }

        Ok(result)
    }

    /// Run a read statement expected to match at most one row.
    pub async fn fetch_optional(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Option<JsonRow>, StoreError> {
        let row = bind_params(sql, params)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(StoreError::Query)?;
        row.as_ref().map(row_to_json).transpose()
    }

    /// `SELECT COUNT(*)` over a whole table.
    pub async fn count_rows(&mut self, table: Table) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let row = sqlx::query(&sql)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(StoreError::Query)?;
        row.try_get::<i64, _>(0).map_err(|source| StoreError::Decode {
            column: "COUNT(*)".to_string(),
            source,
        })
    }

    /// Run a write statement, returning the number of affected rows.
    pub async fn run(&mut self, sql: &str, params: &[SqlParam]) -> Result<u64, StoreError> {
        bind_params(sql, params)
            .execute(&mut *self.tx)
            .await
            .map(|done| done.rows_affected())
            .map_err(StoreError::Query)
    }

    /// Run a multi-statement script such as the schema DDL.
    pub async fn run_script(&mut self, script: &str) -> Result<(), StoreError> {
        // SQLite steps through every statement in the string.
        sqlx::query(script)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::Bootstrap)?;
        Ok(())
    }
}

fn ensure_parent_dir(file_path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
