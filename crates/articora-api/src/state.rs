//! Application state shared across handlers

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use articora_core::encryption::KeyError;
use articora_core::{AppError, Config};
use articora_db::VerificationDocumentRepository;
use articora_services::{RetentionSweeper, VerificationService};

pub struct AppState {
    pub config: Config,
    /// Present when the encryption key loaded; the error is kept so every
    /// upload attempt can report why uploads are disabled.
    pub verification: Result<Arc<VerificationService>, KeyError>,
    pub repository: VerificationDocumentRepository,
    pub sweeper: Arc<RetentionSweeper>,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        verification: Result<Arc<VerificationService>, KeyError>,
        repository: VerificationDocumentRepository,
        sweeper: Arc<RetentionSweeper>,
    ) -> Self {
        Self {
            config,
            verification,
            repository,
            sweeper,
            sweeper_handle: Mutex::new(None),
        }
    }

    /// Record the running sweeper task so shutdown can wait for it
    pub fn set_sweeper_handle(&self, handle: JoinHandle<()>) {
        if let Ok(mut slot) = self.sweeper_handle.lock() {
            *slot = Some(handle);
        }
    }

    /// The upload service, or the key failure that disabled it
    pub fn verification(&self) -> Result<&VerificationService, AppError> {
        match &self.verification {
            Ok(service) => Ok(service),
            Err(e) => Err(AppError::from(*e)),
        }
    }

    /// Stop the retention sweeper and wait for its loop to exit
    pub async fn shutdown_background(&self) {
        self.sweeper.stop();

        let handle = match self.sweeper_handle.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Retention sweeper task panicked");
            }
        }
    }
}
