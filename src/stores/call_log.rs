//! Call-log store reader.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::debug;

use crate::model::{CallLogEntry, CallType};

use super::{open_readonly, StoreError};

/// Row type returned by SQLite queries for call-log entries.
type CallRow = (String, Option<String>, i64, i64, i64);

/// Fetch every call-log row, newest first.
///
/// # Errors
///
/// Returns [`StoreError::Query`] on SQLite failure.
pub async fn recent_calls(db: &SqlitePool) -> Result<Vec<CallLogEntry>, StoreError> {
    let rows: Vec<CallRow> = sqlx::query_as(
        "SELECT number, cached_name, duration, type, date \
         FROM calls ORDER BY date DESC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(number, name, duration, raw_type, date_ms)| CallLogEntry {
            number,
            name,
            // A negative duration is store corruption; clamp rather than fail
            // the whole fetch.
            duration_seconds: u64::try_from(duration).unwrap_or(0),
            call_type: CallType::from_raw(raw_type),
            date_ms,
        })
        .collect())
}

/// Open the call-log store read-only, fetch all rows, and close.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when the store file is missing, or
/// [`StoreError::Query`] on SQLite failure.
pub async fn fetch(db_path: &Path) -> Result<Vec<CallLogEntry>, StoreError> {
    let pool = open_readonly(db_path).await?;
    let result = recent_calls(&pool).await;
    pool.close().await;
    if let Ok(entries) = &result {
        debug!(rows = entries.len(), "call-log store queried");
    }
    result
}
