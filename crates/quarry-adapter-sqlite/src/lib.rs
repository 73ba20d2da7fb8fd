//! # quarry-adapter-sqlite
//!
//! The storage gateway: the only code in Quarry that talks to the database.
//!
//! Every access goes through [`Database::with_session`], which opens a
//! transaction, runs the caller's operation against a [`Session`], and commits
//! on success or rolls back on failure before returning.
//!
//! ```ignore
//! use quarry_adapter_sqlite::{Database, SqlParam};
//!
//! let db = Database::connect(&config.database).await?;
//! let rows = db
//!     .with_session(|session| {
//!         Box::pin(async move {
//!             session
//!                 .execute("SELECT * FROM customers WHERE id = ?", &[SqlParam::Integer(1)])
//!                 .await
//!         })
//!     })
//!     .await?;
//! ```

pub mod bootstrap;
pub mod error;
pub mod seed;
pub mod session;
pub mod value;

// Re-export sqlx for convenience
pub use sqlx;
pub use sqlx::SqlitePool;

pub use error::StoreError;
pub use seed::{SeedPlan, SeedReport};
pub use session::{Database, Session};
pub use value::{JsonRow, QueryRows, SqlParam};
