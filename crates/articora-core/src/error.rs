//! Error types module
//!
//! This module provides the core error types used throughout the Articora
//! verification service. All errors are unified under the `AppError` enum
//! which can represent database, storage, validation, encryption, and other
//! domain-specific errors.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a disabled upload path
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Invalid document kind: {0}")]
    InvalidDocumentKind(String),

    #[error("Unsupported file type: {mime_type} (allowed: {allowed})")]
    UnsupportedMimeType {
        mime_type: String,
        allowed: &'static str,
    },

    #[error("File too large: {size} bytes exceeds limit of {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Encryption key is not configured")]
    MissingEncryptionKey,

    #[error("Encryption key must decode to 32 bytes, got {0}")]
    InvalidEncryptionKeyLength(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    #[error("Metadata write failed: {0}")]
    MetadataWriteFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Error conversion implementations following Rust best practices
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidDocumentKind(_) => (
            400,
            "INVALID_DOCUMENT_KIND",
            false,
            Some("Use 'identity' or 'certificate'"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedMimeType { .. } => (
            400,
            "UNSUPPORTED_MIME_TYPE",
            false,
            Some("Upload a file of an accepted type for this document kind"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileTooLarge { .. } => (
            413,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingEncryptionKey => (
            503,
            "ENCRYPTION_KEY_MISSING",
            false,
            Some("Set ENCRYPTION_KEY to a hex- or base64-encoded 32-byte key"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidEncryptionKeyLength(_) => (
            503,
            "ENCRYPTION_KEY_INVALID",
            false,
            Some("ENCRYPTION_KEY must decode to exactly 32 bytes"),
            false,
            LogLevel::Warn,
        ),
        AppError::EncryptionFailed(_) => (
            500,
            "ENCRYPTION_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageWriteFailed(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MetadataWriteFailed(_) => (
            500,
            "METADATA_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check authentication token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::InvalidDocumentKind(_) => "InvalidDocumentKind",
            AppError::UnsupportedMimeType { .. } => "UnsupportedMimeType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::MissingEncryptionKey => "MissingEncryptionKey",
            AppError::InvalidEncryptionKeyLength(_) => "InvalidEncryptionKeyLength",
            AppError::EncryptionFailed(_) => "EncryptionFailed",
            AppError::StorageWriteFailed(_) => "StorageWriteFailed",
            AppError::MetadataWriteFailed(_) => "MetadataWriteFailed",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        // Add source error chain
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::InvalidDocumentKind(ref kind) => {
                format!("Unknown document kind: {}", kind)
            }
            AppError::UnsupportedMimeType {
                mime_type, allowed, ..
            } => {
                format!("File type {} is not accepted (allowed: {})", mime_type, allowed)
            }
            AppError::FileTooLarge { size, max } => {
                format!("File of {} bytes exceeds the {} byte limit", size, max)
            }
            AppError::MissingEncryptionKey => {
                "Document uploads are temporarily unavailable".to_string()
            }
            AppError::InvalidEncryptionKeyLength(_) => {
                "Document uploads are temporarily unavailable".to_string()
            }
            AppError::EncryptionFailed(_) => "Failed to protect document".to_string(),
            AppError::StorageWriteFailed(_) => "Failed to store document".to_string(),
            AppError::MetadataWriteFailed(_) => "Failed to record document".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
