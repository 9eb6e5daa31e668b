//! Repository for verification document metadata

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use articora_core::models::DocumentKind;
use articora_core::{AppError, VerificationDocument};

/// Encode a timestamp for storage. Fixed width with a trailing `Z` so that
/// string comparison in SQL matches chronological order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

fn decode_uuid(column: &str, raw: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn row_to_document(row: &SqliteRow) -> Result<VerificationDocument, sqlx::Error> {
    let kind_raw: String = row.try_get("document_kind")?;
    let kind = DocumentKind::from_str(&kind_raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: "document_kind".to_string(),
        source: Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
    })?;

    let id_raw: String = row.try_get("id")?;
    let owner_raw: String = row.try_get("owner_user_id")?;
    let uploaded_raw: String = row.try_get("uploaded_at")?;
    let expires_raw: String = row.try_get("expires_at")?;

    Ok(VerificationDocument {
        id: decode_uuid("id", &id_raw)?,
        owner_user_id: decode_uuid("owner_user_id", &owner_raw)?,
        storage_path: row.try_get("storage_path")?,
        iv_hex: row.try_get("iv_hex")?,
        kind,
        original_filename: row.try_get("original_filename")?,
        mime_type: row.try_get("mime_type")?,
        uploaded_at: decode_timestamp("uploaded_at", &uploaded_raw)?,
        expires_at: decode_timestamp("expires_at", &expires_raw)?,
        verification_completed: row.try_get::<i64, _>("verification_completed")? != 0,
    })
}

/// Repository for the verification_documents table
#[derive(Clone)]
pub struct VerificationDocumentRepository {
    pool: SqlitePool,
}

impl VerificationDocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a metadata row. Called only after the ciphertext file is on
    /// disk; the row is what makes the document exist.
    pub async fn create(&self, doc: &VerificationDocument) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO verification_documents (
                id, owner_user_id, storage_path, iv_hex, document_kind,
                original_filename, mime_type, uploaded_at, expires_at,
                verification_completed
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(doc.id.to_string())
        .bind(doc.owner_user_id.to_string())
        .bind(&doc.storage_path)
        .bind(&doc.iv_hex)
        .bind(doc.kind.as_str())
        .bind(&doc.original_filename)
        .bind(&doc.mime_type)
        .bind(encode_timestamp(&doc.uploaded_at))
        .bind(encode_timestamp(&doc.expires_at))
        .bind(doc.verification_completed as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationDocument>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_user_id, storage_path, iv_hex, document_kind,
                   original_filename, mime_type, uploaded_at, expires_at,
                   verification_completed
            FROM verification_documents
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose().map_err(AppError::from)
    }

    pub async fn find_by_owner(
        &self,
        owner_user_id: Uuid,
    ) -> Result<Vec<VerificationDocument>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_user_id, storage_path, iv_hex, document_kind,
                   original_filename, mime_type, uploaded_at, expires_at,
                   verification_completed
            FROM verification_documents
            WHERE owner_user_id = ?1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(owner_user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(row_to_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    /// Rows the sweeper may remove: expired, or already reviewed
    pub async fn find_deletable(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VerificationDocument>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_user_id, storage_path, iv_hex, document_kind,
                   original_filename, mime_type, uploaded_at, expires_at,
                   verification_completed
            FROM verification_documents
            WHERE expires_at < ?1 OR verification_completed = 1
            "#,
        )
        .bind(encode_timestamp(&now))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(row_to_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    /// Bulk-delete deletable rows with the same predicate as `find_deletable`.
    /// Returns the number of rows removed.
    pub async fn delete_deletable(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM verification_documents
            WHERE expires_at < ?1 OR verification_completed = 1
            "#,
        )
        .bind(encode_timestamp(&now))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flag a document as reviewed, making it eligible for the next sweep.
    /// Returns false if no such document exists.
    pub async fn mark_completed(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE verification_documents
            SET verification_completed = 1
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
