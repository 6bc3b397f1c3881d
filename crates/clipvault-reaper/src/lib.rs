//! Background expiry sweep.
//!
//! Every video carries a fixed `expires_at`. The reaper periodically removes
//! rows past that point along with their stored objects. Sweeps are
//! idempotent and per-row failures never stop the rest of the pass;
//! `sweep_once` is public so tests can drive a sweep directly instead of
//! waiting out the interval.

use chrono::Utc;
use clipvault_db::VideoRepository;
use clipvault_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

#[derive(Clone)]
pub struct ExpiryReaper {
    videos: VideoRepository,
    storage: Arc<dyn Storage>,
    sweep_interval: Duration,
}

impl ExpiryReaper {
    pub fn new(videos: VideoRepository, storage: Arc<dyn Storage>, sweep_interval: Duration) -> Self {
        Self {
            videos,
            storage,
            sweep_interval,
        }
    }

    /// Start the background sweep task.
    /// Returns a JoinHandle for graceful shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.sweep_interval);

            loop {
                sweep_interval.tick().await;

                tracing::info!("Starting scheduled sweep of expired videos");

                match self.sweep_once().await {
                    Ok(removed) => {
                        tracing::info!(removed, "Sweep completed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Sweep failed");
                    }
                }
            }
        })
    }

    /// Remove every video whose retention window has passed.
    ///
    /// The stored object is deleted first and the metadata row only after
    /// that succeeds. A row whose remote delete failed is left in place so
    /// the next run retries it; dropping the row first would orphan the
    /// object with nothing left pointing at its key. Returns the number of
    /// rows removed.
    #[tracing::instrument(skip(self))]
    pub async fn sweep_once(&self) -> Result<usize, anyhow::Error> {
        let expired = self.videos.get_expired(Utc::now()).await?;
        let mut removed = 0usize;

        for video in expired {
            tracing::info!(
                video_id = %video.id,
                storage_key = %video.storage_key,
                expires_at = ?video.expires_at,
                "Deleting expired video"
            );

            match self.storage.delete(&video.storage_key).await {
                Ok(_) => {
                    tracing::debug!(storage_key = %video.storage_key, "Successfully deleted from storage");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        storage_key = %video.storage_key,
                        "Failed to delete file from storage, leaving row for next sweep"
                    );
                    continue;
                }
            }

            match self.videos.delete_by_id(video.id).await {
                Ok(true) => {
                    removed += 1;
                    tracing::debug!(video_id = %video.id, "Successfully deleted from database");
                }
                // Another sweep or a user delete got there first.
                Ok(false) => {
                    tracing::debug!(video_id = %video.id, "Row already removed");
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        video_id = %video.id,
                        "Failed to delete from database"
                    );
                }
            }
        }

        Ok(removed)
    }
}
