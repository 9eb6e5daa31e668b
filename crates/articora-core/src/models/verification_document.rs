//! Verification document model

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppError;

/// How long an unreviewed document is kept before the sweeper removes it
pub const RETENTION_HOURS: i64 = 72;

/// The kind of document a user submits for verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Government-issued photo ID
    Identity,
    /// Professional certificate or diploma
    Certificate,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Identity => "identity",
            DocumentKind::Certificate => "certificate",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(DocumentKind::Identity),
            "certificate" => Ok(DocumentKind::Certificate),
            other => Err(AppError::InvalidDocumentKind(other.to_string())),
        }
    }
}

/// Metadata row for an encrypted document on disk.
///
/// The row is the sole source of truth for a document's existence: a file
/// without a row is an orphan for the sweeper, never a live document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    /// Absolute path of the ciphertext file; derived from a generated
    /// filename, never from user input
    pub storage_path: String,
    /// Hex-encoded CBC initialization vector for this document
    pub iv_hex: String,
    pub kind: DocumentKind,
    /// Sanitized client filename, kept for display and audit only
    pub original_filename: String,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    /// Fixed at upload time; never extended
    pub expires_at: DateTime<Utc>,
    pub verification_completed: bool,
}

impl VerificationDocument {
    pub fn new(
        owner_user_id: Uuid,
        storage_path: String,
        iv_hex: String,
        kind: DocumentKind,
        original_filename: String,
        mime_type: String,
    ) -> Self {
        let uploaded_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_user_id,
            storage_path,
            iv_hex,
            kind,
            original_filename,
            mime_type,
            uploaded_at,
            expires_at: expiry_for(uploaded_at),
            verification_completed: false,
        }
    }

    /// Whether the sweeper may remove this document at the given instant
    pub fn is_deletable(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now || self.verification_completed
    }
}

/// Retention deadline for a document uploaded at the given instant
pub fn expiry_for(uploaded_at: DateTime<Utc>) -> DateTime<Utc> {
    uploaded_at + Duration::hours(RETENTION_HOURS)
}

/// Upload receipt returned to the client. No storage details leak out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReceipt {
    pub id: Uuid,
    pub document_kind: DocumentKind,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&VerificationDocument> for VerificationReceipt {
    fn from(doc: &VerificationDocument) -> Self {
        Self {
            id: doc.id,
            document_kind: doc.kind,
            uploaded_at: doc.uploaded_at,
            expires_at: doc.expires_at,
        }
    }
}
