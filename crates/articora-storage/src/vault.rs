//! Local filesystem vault for encrypted documents

use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use rand::RngCore;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Random suffix length in bytes (12 hex characters in the filename)
const FILENAME_RANDOM_BYTES: usize = 6;

/// Filesystem vault rooted at a directory outside any served tree.
///
/// The root is created with mode 0700 and files with 0600; nothing under it
/// is ever world-readable.
#[derive(Clone)]
pub struct VaultStorage {
    base_path: PathBuf,
}

impl VaultStorage {
    /// Create the vault, creating and locking down the root directory if
    /// needed. The stored root is canonical so traversal checks are exact.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create vault directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&base_path, std::fs::Permissions::from_mode(0o700))
                .await
                .map_err(|e| {
                    StorageError::ConfigError(format!(
                        "Failed to set permissions on {}: {}",
                        base_path.display(),
                        e
                    ))
                })?;
        }

        let base_path = base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize vault path: {}", e))
        })?;

        Ok(VaultStorage { base_path })
    }

    /// Validate that a stored path points inside the vault
    fn resolve(&self, storage_path: &str) -> StorageResult<PathBuf> {
        let path = Path::new(storage_path);

        if path.components().any(|c| c == Component::ParentDir) {
            return Err(StorageError::InvalidPath(
                "Storage path contains parent directory components".to_string(),
            ));
        }

        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidPath(
                "Storage path resolves outside the vault".to_string(),
            ));
        }

        Ok(path.to_path_buf())
    }

    fn check_filename(filename: &str) -> StorageResult<()> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(StorageError::InvalidPath(format!(
                "Invalid vault filename: {}",
                filename
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for VaultStorage {
    fn generate_filename(&self, owner_user_id: Uuid) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        let mut suffix = [0u8; FILENAME_RANDOM_BYTES];
        rand::rng().fill_bytes(&mut suffix);

        format!("{}_{}_{}.enc", millis, owner_user_id, hex::encode(suffix))
    }

    async fn write_new(&self, filename: &str, data: &[u8]) -> StorageResult<String> {
        Self::check_filename(filename)?;
        let path = self.base_path.join(filename);
        let size = data.len();

        let start = std::time::Instant::now();

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Vault write successful"
        );

        Ok(path.to_string_lossy().into_owned())
    }

    async fn read(&self, storage_path: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(storage_path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn delete(&self, storage_path: &str) -> StorageResult<()> {
        let path = self.resolve(storage_path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            // Already gone; deletion is idempotent
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Vault delete successful");

        Ok(())
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let path = self.resolve(storage_path)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn base_dir(&self) -> &Path {
        &self.base_path
    }
}
