//! Storage abstraction trait
//!
//! This module defines the Storage trait the verification pipeline writes
//! through, keeping the service logic decoupled from the filesystem backend.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Paths handed back by `write_new` are absolute and opaque to callers; they
/// go into the metadata row and come back verbatim for reads and deletes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a fresh collision-resistant filename for a document owned by
    /// the given user. User-supplied names never reach the filesystem.
    fn generate_filename(&self, owner_user_id: Uuid) -> String;

    /// Write a new file under the vault root and return its absolute path.
    ///
    /// The write is exclusive: an existing file with the same name is an
    /// error, never overwritten.
    async fn write_new(&self, filename: &str, data: &[u8]) -> StorageResult<String>;

    /// Read a file previously written by `write_new`
    async fn read(&self, storage_path: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file. A file that is already gone is success.
    async fn delete(&self, storage_path: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_path: &str) -> StorageResult<bool>;

    /// Root directory of the vault
    fn base_dir(&self) -> &Path;
}
