//! Bounded worker pool for bulk footprint extraction.
//!
//! Sources are fanned out to spawned tasks gated by a semaphore. Results
//! flow back through a channel, failures are logged and dropped, and the
//! survivors are returned in input order. Progress goes to a pluggable
//! [`ProgressObserver`] rather than being interleaved with the extraction.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

use super::Footprint;
use crate::reader::ReadError;

/// Derives a footprint from a source file.
///
/// Implementations typically open the raster and read its geographic
/// bounds; this crate does not decode rasters itself.
pub trait FootprintExtractor: Send + Sync + 'static {
    fn extract(&self, source: &str) -> impl Future<Output = Result<Footprint, ReadError>> + Send;
}

/// Receives progress notifications from [`get_footprints`].
pub trait ProgressObserver: Send + Sync {
    /// Called once before any work starts.
    fn on_start(&self, _total: usize) {}

    /// Called as each source finishes, in completion order.
    fn on_complete(&self, source: &str, succeeded: bool);

    /// Called once after the last source finished.
    fn on_finish(&self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressObserver for NoOpProgress {
    fn on_complete(&self, _source: &str, _succeeded: bool) {}
}

/// Extracts footprints for `sources` with at most `max_concurrency`
/// extractions in flight.
///
/// Sources whose extraction fails are logged at `warn` and left out. The
/// returned footprints follow the order of `sources`.
///
/// Must be called from within a tokio runtime.
pub async fn get_footprints<E: FootprintExtractor>(
    sources: &[String],
    extractor: Arc<E>,
    max_concurrency: usize,
    observer: &dyn ProgressObserver,
) -> Vec<Footprint> {
    let workers = max_concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));
    let (tx, mut rx) = mpsc::channel(workers);

    observer.on_start(sources.len());
    debug!(sources = sources.len(), workers, "extracting footprints");

    for (index, source) in sources.iter().cloned().enumerate() {
        let tx = tx.clone();
        let extractor = Arc::clone(&extractor);
        let semaphore = Arc::clone(&semaphore);
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let result = extractor.extract(&source).await;
            // Receiver only goes away if the caller was dropped
            let _ = tx.send((index, source, result)).await;
        });
    }
    drop(tx);

    let mut collected = Vec::with_capacity(sources.len());
    while let Some((index, source, result)) = rx.recv().await {
        match result {
            Ok(footprint) => {
                observer.on_complete(&source, true);
                collected.push((index, footprint));
            }
            Err(e) => {
                warn!(source = %source, error = %e, "footprint extraction failed");
                observer.on_complete(&source, false);
            }
        }
    }
    observer.on_finish();

    collected.sort_by_key(|(index, _)| *index);
    collected.into_iter().map(|(_, footprint)| footprint).collect()
}
