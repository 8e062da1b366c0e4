//! Bounded media downloader.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use tgstickers_core::error::{Result, StickersError};
use tgstickers_core::gateway::{MediaLocation, TelegramGateway};

/// One file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub location: MediaLocation,
    pub destination: PathBuf,
}

/// A download that did not complete.
#[derive(Debug, Clone)]
pub struct FailedDownload {
    pub destination: PathBuf,
    pub error: StickersError,
}

/// Per-item outcome of a batch, in submission order.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub completed: Vec<PathBuf>,
    pub failed: Vec<FailedDownload>,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Converts a report with failures into `StickersError::MediaDownload`.
    pub fn into_result(self, short_name: &str) -> Result<Vec<PathBuf>> {
        if self.is_success() {
            return Ok(self.completed);
        }
        Err(StickersError::MediaDownload {
            short_name: short_name.to_string(),
            failed: self.failed.len(),
            total: self.total(),
            errors: self
                .failed
                .iter()
                .map(|f| format!("{}: {}", f.destination.display(), f.error))
                .collect(),
        })
    }
}

/// Downloads media through the gateway with at most `max_concurrent`
/// transfers in flight.
///
/// Every item is attempted; a failure never cancels the others and files
/// that completed stay on disk.
#[derive(Clone)]
pub struct MediaDownloader {
    gateway: Arc<dyn TelegramGateway>,
    permits: Arc<Semaphore>,
}

impl MediaDownloader {
    pub fn new(gateway: Arc<dyn TelegramGateway>, max_concurrent: usize) -> Self {
        Self {
            gateway,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn download_all(&self, items: Vec<MediaItem>) -> DownloadReport {
        let total = items.len();
        tracing::debug!("Downloading {} media files", total);

        let outcomes = join_all(items.into_iter().map(|item| self.download_one(item))).await;

        let mut report = DownloadReport::default();
        for (destination, outcome) in outcomes {
            match outcome {
                Ok(()) => report.completed.push(destination),
                Err(error) => {
                    tracing::warn!("Failed to download {}: {}", destination.display(), error);
                    report.failed.push(FailedDownload { destination, error });
                }
            }
        }

        tracing::info!(
            "Downloaded {}/{} media files",
            report.completed.len(),
            total
        );
        report
    }

    async fn download_one(&self, item: MediaItem) -> (PathBuf, Result<()>) {
        let outcome = match self.permits.acquire().await {
            Ok(_permit) => {
                tracing::debug!("Downloading {}", item.destination.display());
                self.gateway
                    .download_file(&item.location, &item.destination)
                    .await
            }
            Err(e) => Err(StickersError::io(format!("Download pool closed: {}", e))),
        };
        (item.destination, outcome)
    }
}
