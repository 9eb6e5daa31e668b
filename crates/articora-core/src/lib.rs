//! Articora Core Library
//!
//! This crate provides the core domain models, error types, configuration,
//! encryption primitives, and upload validation shared across the Articora
//! verification service components.

pub mod config;
pub mod encryption;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use encryption::{DocumentCipher, EncryptedDocument, EncryptionKey, KeyError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{DocumentKind, VerificationDocument, VerificationReceipt};
pub use validation::{DocumentValidator, ValidationError};
