//! Retention sweeper
//!
//! Background task that periodically removes documents that have expired or
//! whose review has finished. Files go first (a missing file is fine), then
//! the matching rows are bulk-deleted with the same predicate. A failed sweep
//! is logged and retried at the next tick; it never takes the server down.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use articora_core::AppError;
use articora_db::VerificationDocumentRepository;
use articora_storage::Storage;

/// What a single sweep accomplished
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepOutcome {
    pub files_deleted: usize,
    pub file_errors: usize,
    pub rows_deleted: u64,
}

pub struct RetentionSweeper {
    repository: VerificationDocumentRepository,
    storage: Arc<dyn Storage>,
    sweep_interval: Duration,
    shutdown: CancellationToken,
}

impl RetentionSweeper {
    pub fn new(
        repository: VerificationDocumentRepository,
        storage: Arc<dyn Storage>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            repository,
            storage,
            sweep_interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// Start the background sweep loop.
    /// Returns a JoinHandle that completes after `stop` is called.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.sweep_interval);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        tracing::info!("Retention sweeper stopped");
                        break;
                    }
                    _ = sweep_interval.tick() => {
                        match self.sweep(Utc::now()).await {
                            Ok(outcome) => {
                                tracing::info!(
                                    files_deleted = outcome.files_deleted,
                                    file_errors = outcome.file_errors,
                                    rows_deleted = outcome.rows_deleted,
                                    "Retention sweep completed"
                                );
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Retention sweep failed, retrying next tick");
                            }
                        }
                    }
                }
            }
        })
    }

    /// Request the sweep loop to exit
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Run one sweep at the given instant.
    ///
    /// Per-document file errors are logged and skipped so one bad file cannot
    /// stall the rest of the sweep.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome, AppError> {
        let deletable = self.repository.find_deletable(now).await?;
        let mut outcome = SweepOutcome::default();

        for doc in &deletable {
            tracing::info!(
                document_id = %doc.id,
                expires_at = %doc.expires_at,
                verification_completed = doc.verification_completed,
                "Removing document"
            );

            match self.storage.delete(&doc.storage_path).await {
                Ok(()) => outcome.files_deleted += 1,
                Err(e) => {
                    outcome.file_errors += 1;
                    tracing::error!(
                        error = %e,
                        document_id = %doc.id,
                        path = %doc.storage_path,
                        "Failed to delete file, continuing with sweep"
                    );
                }
            }
        }

        // Bulk delete with the same cutoff the selection used
        outcome.rows_deleted = self.repository.delete_deletable(now).await?;

        Ok(outcome)
    }
}
