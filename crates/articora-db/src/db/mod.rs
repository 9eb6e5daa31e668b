//! Database pool setup and schema
//!
//! The metadata store is an embedded SQLite database. Timestamps are stored
//! as fixed-width RFC 3339 UTC strings (millisecond precision) so that SQL
//! string comparison orders them chronologically.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod verification;

/// Open the SQLite pool, creating the database file if needed
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    timeout_seconds: u64,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(timeout_seconds))
        .connect_with(options)
        .await
}

/// Create the metadata table if it does not exist
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verification_documents (
            id TEXT PRIMARY KEY,
            owner_user_id TEXT NOT NULL,
            storage_path TEXT NOT NULL UNIQUE,
            iv_hex TEXT NOT NULL,
            document_kind TEXT NOT NULL,
            original_filename TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            uploaded_at TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            verification_completed INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_verification_documents_expires_at
        ON verification_documents (expires_at)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
