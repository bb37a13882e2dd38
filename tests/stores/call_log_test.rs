//! Tests for `src/stores/call_log.rs`.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use rotary::model::CallType;
use rotary::stores::{call_log, StoreError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a temp dir with an empty call-log store.
async fn make_call_log_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("calllog.db");

    let opts = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .expect("pool should connect");

    sqlx::query(
        "CREATE TABLE calls (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            number TEXT NOT NULL,
            cached_name TEXT,
            duration INTEGER NOT NULL,
            type INTEGER NOT NULL,
            date INTEGER NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("schema should apply");

    pool.close().await;

    (dir, db_path)
}

/// Insert a call row.
async fn insert_call(
    db_path: &Path,
    number: &str,
    cached_name: Option<&str>,
    duration: i64,
    call_type: i64,
    date: i64,
) {
    let opts = SqliteConnectOptions::new().filename(db_path);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .expect("connect");

    sqlx::query(
        "INSERT INTO calls (number, cached_name, duration, type, date) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(number)
    .bind(cached_name)
    .bind(duration)
    .bind(call_type)
    .bind(date)
    .execute(&pool)
    .await
    .expect("insert call");

    pool.close().await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_store_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let absent = dir.path().join("no_such.db");

    let result = call_log::fetch(&absent).await;
    let err = result.expect_err("missing store should fail");
    assert!(
        matches!(err, StoreError::NotFound(_)),
        "expected NotFound, got: {err}"
    );
}

#[tokio::test]
async fn empty_store_returns_no_rows() {
    let (_dir, db_path) = make_call_log_db().await;

    let calls = call_log::fetch(&db_path).await.expect("fetch");
    assert!(calls.is_empty());
}

#[tokio::test]
async fn rows_come_back_most_recent_first() {
    let (_dir, db_path) = make_call_log_db().await;
    insert_call(&db_path, "111", None, 10, 1, 1_000).await;
    insert_call(&db_path, "333", None, 10, 1, 3_000).await;
    insert_call(&db_path, "222", None, 10, 1, 2_000).await;

    let calls = call_log::fetch(&db_path).await.expect("fetch");
    let numbers: Vec<&str> = calls.iter().map(|c| c.number.as_str()).collect();
    assert_eq!(numbers, vec!["333", "222", "111"]);
}

#[tokio::test]
async fn call_type_codes_map_to_variants() {
    let (_dir, db_path) = make_call_log_db().await;
    insert_call(&db_path, "1", None, 0, 1, 4_000).await;
    insert_call(&db_path, "2", None, 0, 2, 3_000).await;
    insert_call(&db_path, "3", None, 0, 3, 2_000).await;
    insert_call(&db_path, "4", None, 0, 7, 1_000).await;

    let calls = call_log::fetch(&db_path).await.expect("fetch");
    let types: Vec<CallType> = calls.iter().map(|c| c.call_type).collect();
    assert_eq!(
        types,
        vec![
            CallType::Incoming,
            CallType::Outgoing,
            CallType::Missed,
            CallType::Unknown,
        ]
    );
}

#[tokio::test]
async fn display_name_falls_back_to_number() {
    let (_dir, db_path) = make_call_log_db().await;
    insert_call(&db_path, "5551234", Some("Ada Lovelace"), 60, 2, 3_000).await;
    insert_call(&db_path, "5559876", None, 60, 1, 2_000).await;
    insert_call(&db_path, "5550000", Some("   "), 60, 1, 1_000).await;

    let calls = call_log::fetch(&db_path).await.expect("fetch");
    assert_eq!(calls[0].display_name(), "Ada Lovelace");
    assert_eq!(calls[1].display_name(), "5559876");
    // Whitespace-only cached names are treated as absent.
    assert_eq!(calls[2].display_name(), "5550000");
}

#[tokio::test]
async fn negative_duration_clamps_to_zero() {
    let (_dir, db_path) = make_call_log_db().await;
    insert_call(&db_path, "111", None, -5, 1, 1_000).await;

    let calls = call_log::fetch(&db_path).await.expect("fetch");
    assert_eq!(calls[0].duration_seconds, 0);
}
