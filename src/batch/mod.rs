//! Batch page generation: enumerate a reference corpus, generate a page per item with a
//! bounded worker pool, and report the items that produced no output.

pub mod dispatcher;
pub mod failures;
pub mod item;

pub use dispatcher::{BatchReport, Dispatcher, DEFAULT_RATE_LIMIT_COOLDOWN};
pub use failures::FailureTracker;
pub use item::{target_path, ItemOutcome, ItemProcessor, ProcessItem, SourcePage};

use crate::corpus;
use crate::error::BatchError;
use crate::provider::GenerationClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Settings for one batch job.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Concurrent workers; must be positive
    pub workers: i64,
    /// Regenerate pages whose target already exists
    pub override_existing: bool,
    /// Prompt template with one `%s` slot for the command title
    pub prompt: String,
    /// Pause for a worker whose item was rate limited
    pub cooldown: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 10,
            override_existing: false,
            prompt: crate::config::PROMPT_EN.to_string(),
            cooldown: DEFAULT_RATE_LIMIT_COOLDOWN,
        }
    }
}

impl BatchOptions {
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.workers <= 0 {
            return Err(BatchError::InvalidConfig(format!(
                "worker count must be positive, got {}",
                self.workers
            )));
        }
        if !self.prompt.contains("%s") {
            return Err(BatchError::InvalidConfig(format!(
                "prompt template must contain a %s slot: '{}'",
                self.prompt
            )));
        }
        Ok(())
    }
}

/// Run a batch job from `corpus_root` into `output_dir`.
///
/// Only configuration and enumeration errors are returned; per-item failures are
/// collected in [`BatchReport::failed`].
pub async fn run_batch(
    corpus_root: &Path,
    output_dir: PathBuf,
    options: &BatchOptions,
    client: Arc<dyn GenerationClient>,
    cancel: CancellationToken,
) -> Result<BatchReport, BatchError> {
    options.validate()?;
    let dispatcher = Dispatcher::new(options.workers, options.cooldown)?;
    let items = corpus::enumerate(corpus_root)?;

    let processor = Arc::new(ItemProcessor::new(
        client,
        output_dir,
        options.prompt.clone(),
        options.override_existing,
    ));
    dispatcher.run(items, processor, cancel).await
}
