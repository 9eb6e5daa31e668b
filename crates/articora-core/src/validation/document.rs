//! Verification upload validation
//!
//! Pure gating logic, run before any encryption or disk work. The MIME type
//! is sniffed from the file's leading bytes rather than trusted from the
//! client-declared Content-Type header; the declared value is kept only for
//! the audit record.

use crate::models::DocumentKind;
use crate::AppError;

/// Identity documents (photo ID scans) cap at 3 MiB
pub const MAX_IDENTITY_BYTES: usize = 3 * 1024 * 1024;
/// Certificates may be multi-page PDFs, cap at 5 MiB
pub const MAX_CERTIFICATE_BYTES: usize = 5 * 1024 * 1024;

const IDENTITY_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];
const CERTIFICATE_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Validation errors for verification uploads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type: {mime_type} (allowed: {allowed})")]
    UnsupportedMimeType {
        mime_type: String,
        allowed: &'static str,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnsupportedMimeType { mime_type, allowed } => {
                AppError::UnsupportedMimeType { mime_type, allowed }
            }
            ValidationError::FileTooLarge { size, max } => AppError::FileTooLarge { size, max },
        }
    }
}

/// Per-kind upload validator
///
/// Type and size violations are distinct errors so clients can tell a wrong
/// file from an oversized one.
pub struct DocumentValidator {
    allowed_mime_types: &'static [&'static str],
    allowed_label: &'static str,
    max_size: usize,
}

impl DocumentValidator {
    pub fn new(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Identity => Self {
                allowed_mime_types: IDENTITY_MIME_TYPES,
                allowed_label: "image/jpeg, image/png",
                max_size: MAX_IDENTITY_BYTES,
            },
            DocumentKind::Certificate => Self {
                allowed_mime_types: CERTIFICATE_MIME_TYPES,
                allowed_label: "application/pdf, image/jpeg, image/png",
                max_size: MAX_CERTIFICATE_BYTES,
            },
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Validate a sniffed MIME type and byte count. Type is checked first.
    pub fn validate(&self, mime_type: &str, size: usize) -> Result<(), ValidationError> {
        if !self.allowed_mime_types.contains(&mime_type) {
            return Err(ValidationError::UnsupportedMimeType {
                mime_type: mime_type.to_string(),
                allowed: self.allowed_label,
            });
        }

        if size > self.max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_size,
            });
        }

        Ok(())
    }
}

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Detect the MIME type from a file's magic numbers.
///
/// Only the three types this service accepts are recognized; anything else
/// returns `None` and is rejected upstream.
pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(PNG_SIGNATURE) {
        Some("image/png")
    } else if data.starts_with(b"%PDF-") {
        Some("application/pdf")
    } else {
        None
    }
}

/// Reduce a client-supplied filename to a safe display string.
///
/// The result is never used to build paths; it is stored for audit only.
pub fn sanitize_original_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .filter(|c| !c.is_control())
        .take(255)
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
