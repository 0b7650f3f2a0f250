//! Failure tracker: concurrent accumulator of source paths that produced no output.

use parking_lot::Mutex;
use std::path::PathBuf;

/// Append-only list of failed source paths shared by all batch workers.
#[derive(Debug, Default)]
pub struct FailureTracker {
    paths: Mutex<Vec<PathBuf>>,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed item. Safe to call from any worker.
    pub fn record(&self, path: PathBuf) {
        self.paths.lock().push(path);
    }

    /// Copy of every recorded path, in recording order.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }
}
