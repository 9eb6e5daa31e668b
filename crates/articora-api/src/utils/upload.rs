//! Multipart extraction for verification uploads

use axum::extract::Multipart;

use articora_core::AppError;

/// The fields of a verification upload form
pub struct VerificationUpload {
    pub data: Vec<u8>,
    pub declared_filename: String,
    pub document_kind: String,
}

/// Extract the `document` file and `document_kind` field from a multipart request.
///
/// Unknown fields are skipped; a duplicate `document` field is rejected.
pub async fn extract_verification_upload(
    mut multipart: Multipart,
) -> Result<VerificationUpload, AppError> {
    let mut data: Option<Vec<u8>> = None;
    let mut declared_filename = "upload".to_string();
    let mut document_kind: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart request: {}", e)))?
    {
        match field.name() {
            Some("document") => {
                if data.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple 'document' fields in request".to_string(),
                    ));
                }
                if let Some(filename) = field.file_name() {
                    declared_filename = filename.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
                data = Some(bytes.to_vec());
            }
            Some("document_kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read field: {}", e)))?;
                document_kind = Some(value);
            }
            _ => {}
        }
    }

    let data = data
        .ok_or_else(|| AppError::InvalidInput("Missing 'document' field".to_string()))?;
    let document_kind = document_kind
        .ok_or_else(|| AppError::InvalidInput("Missing 'document_kind' field".to_string()))?;

    Ok(VerificationUpload {
        data,
        declared_filename,
        document_kind,
    })
}
