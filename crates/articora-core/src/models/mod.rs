//! Domain models

pub mod verification_document;

pub use verification_document::{
    DocumentKind, VerificationDocument, VerificationReceipt, RETENTION_HOURS,
};
