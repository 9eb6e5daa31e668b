use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use articora_core::encryption::{DocumentCipher, EncryptionKey};
use articora_core::Config;
use articora_db::VerificationDocumentRepository;
use articora_services::{RetentionSweeper, VerificationService};
use articora_storage::{Storage, VaultStorage};

use crate::state::AppState;

/// Build the storage vault, upload service, and retention sweeper.
///
/// A bad or missing encryption key disables the upload path but the server
/// still starts; listing and the sweeper keep working.
pub async fn initialize_services(
    config: Config,
    pool: SqlitePool,
) -> Result<Arc<AppState>, anyhow::Error> {
    let storage: Arc<dyn Storage> =
        Arc::new(VaultStorage::new(config.storage_dir.clone()).await?);
    let repository = VerificationDocumentRepository::new(pool);

    let verification = match EncryptionKey::from_config(config.encryption_key.as_deref()) {
        Ok(key) => Ok(Arc::new(VerificationService::new(
            DocumentCipher::new(key),
            storage.clone(),
            repository.clone(),
        ))),
        Err(e) => {
            tracing::warn!(error = %e, "Encryption key unavailable, document uploads disabled");
            Err(e)
        }
    };

    let sweeper = Arc::new(RetentionSweeper::new(
        repository.clone(),
        storage,
        Duration::from_secs(config.sweep_interval_secs),
    ));

    let state = Arc::new(AppState::new(config, verification, repository, sweeper.clone()));
    state.set_sweeper_handle(sweeper.start());

    Ok(state)
}
