//! Upload validation

pub mod document;

pub use document::{
    sanitize_original_filename, sniff_mime_type, DocumentValidator, ValidationError,
    MAX_CERTIFICATE_BYTES, MAX_IDENTITY_BYTES,
};
