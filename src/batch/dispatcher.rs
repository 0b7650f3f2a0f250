//! Bounded work dispatcher: a fixed pool of worker tasks draining a shared index counter.
//!
//! Each worker claims the next unclaimed index, runs the item processor on it and records
//! the outcome. A rate-limited item pauses only the worker that handled it.

use crate::batch::failures::FailureTracker;
use crate::batch::item::{ItemOutcome, ProcessItem};
use crate::error::BatchError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pause applied to a worker after its item was rate limited.
pub const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Summary of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Items enumerated
    pub total: usize,
    /// Items a worker ran to a terminal state
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    /// Source paths that produced no output
    pub failed: Vec<PathBuf>,
    /// Items handled by each worker, indexed by worker id
    pub per_worker: Vec<usize>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

#[derive(Default)]
struct Counters {
    next: AtomicUsize,
    processed: AtomicUsize,
    written: AtomicUsize,
    skipped: AtomicUsize,
}

/// Runs a processor over every item with at most `workers` concurrent executions.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
    cooldown: Duration,
}

impl Dispatcher {
    /// Fails with `InvalidConfig` unless `workers` is positive.
    pub fn new(workers: i64, cooldown: Duration) -> Result<Self, BatchError> {
        if workers <= 0 {
            return Err(BatchError::InvalidConfig(format!(
                "worker count must be positive, got {}",
                workers
            )));
        }
        let workers = usize::try_from(workers).map_err(|_| {
            BatchError::InvalidConfig(format!("worker count {} is too large", workers))
        })?;
        Ok(Self { workers, cooldown })
    }

    /// Process every item exactly once and wait for all workers.
    ///
    /// Once `cancel` fires, workers stop claiming items; an item already in
    /// flight finishes normally.
    pub async fn run<P: ProcessItem>(
        &self,
        items: Vec<PathBuf>,
        processor: Arc<P>,
        cancel: CancellationToken,
    ) -> Result<BatchReport, BatchError> {
        let total = items.len();
        let items = Arc::new(items);
        let counters = Arc::new(Counters::default());
        let failures = Arc::new(FailureTracker::new());
        let worker_count = self.workers.min(total);

        info!(total, workers = worker_count, "Starting batch");

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let items = Arc::clone(&items);
            let counters = Arc::clone(&counters);
            let failures = Arc::clone(&failures);
            let processor = Arc::clone(&processor);
            let cancel = cancel.clone();
            let cooldown = self.cooldown;

            handles.push(tokio::spawn(async move {
                worker_loop(
                    worker_id, items, processor, counters, failures, cancel, cooldown,
                )
                .await
            }));
        }

        let mut per_worker = Vec::with_capacity(worker_count);
        let mut panicked = None;
        for handle in handles {
            match handle.await {
                Ok(count) => per_worker.push(count),
                Err(e) => {
                    per_worker.push(0);
                    panicked.get_or_insert_with(|| e.to_string());
                }
            }
        }
        if let Some(message) = panicked {
            return Err(BatchError::WorkerPanicked(message));
        }

        let report = BatchReport {
            total,
            processed: counters.processed.load(Ordering::SeqCst),
            written: counters.written.load(Ordering::SeqCst),
            skipped: counters.skipped.load(Ordering::SeqCst),
            failed: failures.snapshot(),
            per_worker,
        };

        info!(
            total = report.total,
            processed = report.processed,
            written = report.written,
            skipped = report.skipped,
            failed = report.failed.len(),
            cancelled = cancel.is_cancelled(),
            "Batch finished"
        );
        Ok(report)
    }
}

async fn worker_loop<P: ProcessItem>(
    worker_id: usize,
    items: Arc<Vec<PathBuf>>,
    processor: Arc<P>,
    counters: Arc<Counters>,
    failures: Arc<FailureTracker>,
    cancel: CancellationToken,
    cooldown: Duration,
) -> usize {
    debug!(worker_id, "Worker started");
    let total = items.len();
    let mut handled = 0usize;

    while !cancel.is_cancelled() {
        let index = counters.next.fetch_add(1, Ordering::SeqCst);
        let Some(path) = items.get(index) else {
            break;
        };

        let outcome = processor.process(path).await;
        handled += 1;
        let done = counters.processed.fetch_add(1, Ordering::SeqCst) + 1;

        let mut rate_limited = false;
        match outcome {
            ItemOutcome::Written(target) => {
                counters.written.fetch_add(1, Ordering::SeqCst);
                debug!(worker_id, path = %path.display(), target = %target.display(), "Page written");
            }
            ItemOutcome::Skipped(_) => {
                counters.skipped.fetch_add(1, Ordering::SeqCst);
            }
            ItemOutcome::Failed(err) => {
                rate_limited = err.is_rate_limited();
                warn!(worker_id, path = %path.display(), error = %err, "Item failed");
                failures.record(path.clone());
            }
        }

        let percent = done as f64 / total as f64 * 100.0;
        info!(percent, done, total, "Batch progress");

        if rate_limited {
            warn!(worker_id, cooldown_secs = cooldown.as_secs(), "Rate limited, worker pausing");
            tokio::select! {
                _ = sleep(cooldown) => {}
                _ = cancel.cancelled() => {}
            }
        }
    }

    debug!(worker_id, handled, "Worker stopped");
    handled
}
