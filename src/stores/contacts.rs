//! Contacts store reader.

use std::path::Path;

use sqlx::SqlitePool;
use tracing::debug;

use crate::model::Contact;

use super::{open_readonly, StoreError};

/// Row type returned by SQLite queries for contacts.
type ContactRow = (i64, String, Option<String>);

/// Fetch every contact row, ordered by display name.
///
/// A contact with several numbers yields one row per number; a contact with
/// none yields a single row with no number. Blank stored numbers are
/// normalized to `None`. The ordering is the store's own BINARY collation,
/// so it is case-sensitive.
///
/// # Errors
///
/// Returns [`StoreError::Query`] on SQLite failure.
pub async fn all_contacts(db: &SqlitePool) -> Result<Vec<Contact>, StoreError> {
    let rows: Vec<ContactRow> = sqlx::query_as(
        "SELECT c.contact_id, c.display_name, p.number \
         FROM contacts c \
         LEFT JOIN phone_numbers p ON p.contact_id = c.contact_id \
         ORDER BY c.display_name ASC",
    )
    .fetch_all(db)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id, name, number)| Contact {
            id: id.to_string(),
            name,
            phone_number: number.filter(|n| !n.trim().is_empty()),
        })
        .collect())
}

/// Open the contacts store read-only, fetch all rows, and close.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when the store file is missing, or
/// [`StoreError::Query`] on SQLite failure.
pub async fn fetch(db_path: &Path) -> Result<Vec<Contact>, StoreError> {
    let pool = open_readonly(db_path).await?;
    let result = all_contacts(&pool).await;
    pool.close().await;
    if let Ok(contacts) = &result {
        debug!(rows = contacts.len(), "contacts store queried");
    }
    result
}
