//! Read-only access to the platform data stores.
//!
//! The call-log and contacts stores are SQLite databases owned by other
//! subsystems. Rotary opens a short-lived read-only connection per fetch
//! (no persistent pool) and never writes to them. A fetch either yields the
//! full row set or an explicit [`StoreError`]; an empty store is a success
//! with zero rows, never an error.

pub mod call_log;
pub mod contacts;

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Store access error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store database file does not exist.
    #[error("store not found at {0}")]
    NotFound(String),
    /// The store could not be opened or queried.
    #[error("store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open a read-only single-connection pool over a platform store.
///
/// Checks existence first so a missing store surfaces as
/// [`StoreError::NotFound`] instead of SQLite creating an empty database.
/// The caller must close the pool after querying.
async fn open_readonly(db_path: &Path) -> Result<SqlitePool, StoreError> {
    if !db_path.exists() {
        return Err(StoreError::NotFound(db_path.display().to_string()));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .pragma("trusted_schema", "OFF");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}
