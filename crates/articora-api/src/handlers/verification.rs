//! Verification document endpoints

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;

use articora_core::models::DocumentKind;
use articora_core::VerificationReceipt;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::extract_verification_upload;

/// Accept a document upload for verification.
///
/// Expects a multipart form with a `document` file and a `document_kind`
/// field. Returns a receipt; the ciphertext location and IV stay internal.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<VerificationReceipt>, HttpAppError> {
    // Uploads are disabled when the encryption key failed to load
    let service = state.verification()?;

    let upload = extract_verification_upload(multipart).await?;
    let kind: DocumentKind = upload.document_kind.parse()?;

    let doc = service
        .store_document(user.user_id, kind, &upload.declared_filename, &upload.data)
        .await?;

    Ok(Json(VerificationReceipt::from(&doc)))
}

/// List the caller's pending verification documents
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VerificationReceipt>>, HttpAppError> {
    let docs = state
        .repository
        .find_by_owner(user.user_id)
        .await
        .map_err(HttpAppError::from)?;

    let receipts = docs.iter().map(VerificationReceipt::from).collect();
    Ok(Json(receipts))
}
