//! Verification upload pipeline
//!
//! Order matters here: validate, encrypt, write the ciphertext file, then
//! insert the metadata row. The row is the source of truth, so it is written
//! last; a failed insert triggers best-effort removal of the orphaned file.

use std::sync::Arc;

use uuid::Uuid;

use articora_core::encryption::DocumentCipher;
use articora_core::models::DocumentKind;
use articora_core::validation::{sanitize_original_filename, sniff_mime_type, DocumentValidator};
use articora_core::{AppError, VerificationDocument};
use articora_db::VerificationDocumentRepository;
use articora_storage::Storage;

#[derive(Clone)]
pub struct VerificationService {
    cipher: DocumentCipher,
    storage: Arc<dyn Storage>,
    repository: VerificationDocumentRepository,
}

impl VerificationService {
    pub fn new(
        cipher: DocumentCipher,
        storage: Arc<dyn Storage>,
        repository: VerificationDocumentRepository,
    ) -> Self {
        Self {
            cipher,
            storage,
            repository,
        }
    }

    /// Validate, encrypt, and store an uploaded document.
    ///
    /// The MIME type is sniffed from the upload's leading bytes; the declared
    /// filename is sanitized and kept for audit only.
    pub async fn store_document(
        &self,
        owner_user_id: Uuid,
        kind: DocumentKind,
        declared_filename: &str,
        data: &[u8],
    ) -> Result<VerificationDocument, AppError> {
        let validator = DocumentValidator::new(kind);
        // Unrecognized signatures fail the type check with the per-kind allowlist
        let mime_type = sniff_mime_type(data).unwrap_or("application/octet-stream");
        validator.validate(mime_type, data.len())?;

        let original_filename = sanitize_original_filename(declared_filename);

        let encrypted = self.cipher.encrypt(data)?;

        let filename = self.storage.generate_filename(owner_user_id);
        let storage_path = self
            .storage
            .write_new(&filename, &encrypted.ciphertext)
            .await
            .map_err(|e| AppError::StorageWriteFailed(e.to_string()))?;

        let doc = VerificationDocument::new(
            owner_user_id,
            storage_path,
            encrypted.iv_hex,
            kind,
            original_filename,
            mime_type.to_string(),
        );

        if let Err(e) = self.repository.create(&doc).await {
            // The file must not outlive a failed insert; remove it best-effort
            if let Err(cleanup_err) = self.storage.delete(&doc.storage_path).await {
                tracing::debug!(
                    error = %cleanup_err,
                    path = %doc.storage_path,
                    "Failed to remove orphaned file after metadata failure"
                );
            }
            return Err(AppError::MetadataWriteFailed(e.to_string()));
        }

        tracing::info!(
            document_id = %doc.id,
            owner_user_id = %owner_user_id,
            document_kind = doc.kind.as_str(),
            size_bytes = data.len(),
            expires_at = %doc.expires_at,
            "Verification document stored"
        );

        Ok(doc)
    }

    /// Fetch and decrypt a document for the review workflow
    pub async fn read_document(&self, id: Uuid) -> Result<(VerificationDocument, Vec<u8>), AppError> {
        let doc = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

        let ciphertext = self
            .storage
            .read(&doc.storage_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read document: {}", e)))?;

        let plaintext = self.cipher.decrypt(&ciphertext, &doc.iv_hex)?;
        Ok((doc, plaintext))
    }

    /// List a user's pending documents
    pub async fn list_for_owner(
        &self,
        owner_user_id: Uuid,
    ) -> Result<Vec<VerificationDocument>, AppError> {
        self.repository.find_by_owner(owner_user_id).await
    }
}
