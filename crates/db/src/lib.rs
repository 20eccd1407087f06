//! Persistence layer for Defter.
//!
//! Every entity is served through one repository trait with two
//! implementations: a remote PostgreSQL backend (sqlx) and a local JSON
//! key-value store. The backend is chosen once at startup
//! ([`backend::BackendMode`]); callers only ever see the canonical model
//! shapes in [`models`].

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod backend;
pub mod error;
pub mod kv;
pub mod local;
pub mod models;
pub mod remote;
pub mod repositories;

pub use backend::{BackendMode, StorageConfig};
pub use error::{StoreError, StoreResult};
pub use repositories::Storage;

pub type DbPool = sqlx::PgPool;

/// Bounded timeout applied to remote connection acquisition. Expiry surfaces
/// as a retryable [`StoreError::Backend`] rather than hanging a request.
pub const REMOTE_TIMEOUT_SECS: u64 = 30;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(REMOTE_TIMEOUT_SECS))
        .connect(database_url)
        .await
}

/// Verify the database connection is alive.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
