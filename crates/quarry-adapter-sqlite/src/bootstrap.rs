//! Schema creation and reset.

use crate::error::StoreError;
use crate::session::Database;

/// DDL for the four tables and their indexes. Idempotent.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Drops the four tables, children first.
pub const RESET_SQL: &str = include_str!("../sql/reset.sql");

impl Database {
    /// Create any missing tables and indexes.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        self.with_session(|session| Box::pin(async move { session.run_script(SCHEMA_SQL).await }))
            .await?;
        tracing::info!("Database schema ready");
        Ok(())
    }

    /// Drop every table and recreate the schema empty.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.with_session(|session| {
            Box::pin(async move {
                session.run_script(RESET_SQL).await?;
                session.run_script(SCHEMA_SQL).await
            })
        })
        .await?;
        tracing::info!("Database schema reset");
        Ok(())
    }
}
