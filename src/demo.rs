//! Demo store seeding.
//!
//! Creates the call-log and contacts stores at the configured paths and
//! fills them with sample rows, so the UI has data to show without a real
//! telephony stack behind it. Seeding replaces earlier demo rows, so it is
//! safe to run repeatedly.

use std::path::Path;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::RotaryConfig;
use crate::permissions::{GrantLedger, Permission, PermissionError};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Seeding error types.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Store directory could not be created.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Store creation or insert failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Grant ledger could not be written.
    #[error("grant ledger error: {0}")]
    Ledger(#[from] PermissionError),
}

/// Seed both stores with demo rows.
///
/// With `grant_all` set, also primes the grant ledger with every
/// permission, so the UI starts without prompting.
///
/// # Errors
///
/// Returns an error when a store cannot be created or written.
pub async fn seed(config: &RotaryConfig, grant_all: bool) -> Result<(), SeedError> {
    seed_call_log(Path::new(&config.paths.call_log_db)).await?;
    seed_contacts(Path::new(&config.paths.contacts_db)).await?;
    if grant_all {
        let ledger = GrantLedger::new(&config.paths.grant_ledger);
        for permission in [
            Permission::ReadCallLog,
            Permission::ReadContacts,
            Permission::PlaceCall,
        ] {
            ledger.grant(permission)?;
        }
        info!(path = %ledger.path().display(), "primed grant ledger");
    }
    Ok(())
}

/// Open `path` read-write, creating the file and parent directory.
async fn open_writable(path: &Path) -> Result<SqlitePool, SeedError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

async fn seed_call_log(path: &Path) -> Result<(), SeedError> {
    let pool = open_writable(path).await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS calls (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            number TEXT NOT NULL,
            cached_name TEXT,
            duration INTEGER NOT NULL,
            type INTEGER NOT NULL,
            date INTEGER NOT NULL
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query("DELETE FROM calls").execute(&pool).await?;

    let now = Utc::now().timestamp_millis();
    // (number, cached name, duration seconds, type, timestamp ms)
    let calls: [(&str, Option<&str>, i64, i64, i64); 5] = [
        (
            "5551234",
            Some("Ada Lovelace"),
            245,
            2,
            now.saturating_sub(MINUTE_MS.saturating_mul(5)),
        ),
        (
            "5559876",
            Some("Grace Hopper"),
            61,
            1,
            now.saturating_sub(HOUR_MS.saturating_mul(2)),
        ),
        ("5550000", None, 0, 3, now.saturating_sub(DAY_MS)),
        (
            "5552468",
            Some("Ken Thompson"),
            899,
            1,
            now.saturating_sub(DAY_MS.saturating_mul(2)),
        ),
        ("5551313", None, 12, 9, now.saturating_sub(DAY_MS.saturating_mul(3))),
    ];
    for (number, name, duration, call_type, date) in calls {
        sqlx::query(
            "INSERT INTO calls (number, cached_name, duration, type, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(number)
        .bind(name)
        .bind(duration)
        .bind(call_type)
        .bind(date)
        .execute(&pool)
        .await?;
    }
    pool.close().await;
    info!(path = %path.display(), rows = calls.len(), "seeded call log");
    Ok(())
}

async fn seed_contacts(path: &Path) -> Result<(), SeedError> {
    let pool = open_writable(path).await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS contacts (
            contact_id INTEGER PRIMARY KEY,
            display_name TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS phone_numbers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            contact_id INTEGER NOT NULL,
            number TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query("DELETE FROM phone_numbers").execute(&pool).await?;
    sqlx::query("DELETE FROM contacts").execute(&pool).await?;

    let contacts: [(i64, &str); 4] = [
        (1, "Ada Lovelace"),
        (2, "Dennis Ritchie"),
        (3, "Grace Hopper"),
        (4, "Rosalind Franklin"),
    ];
    for (contact_id, display_name) in contacts {
        sqlx::query("INSERT INTO contacts (contact_id, display_name) VALUES (?1, ?2)")
            .bind(contact_id)
            .bind(display_name)
            .execute(&pool)
            .await?;
    }

    // Rosalind Franklin has no number on purpose, to show the no-number row.
    let numbers: [(i64, &str); 4] = [
        (1, "5551234"),
        (2, "5553141"),
        (2, "5552718"),
        (3, "5559876"),
    ];
    for (contact_id, number) in numbers {
        sqlx::query("INSERT INTO phone_numbers (contact_id, number) VALUES (?1, ?2)")
            .bind(contact_id)
            .bind(number)
            .execute(&pool)
            .await?;
    }
    pool.close().await;
    info!(path = %path.display(), rows = contacts.len(), "seeded contacts");
    Ok(())
}
