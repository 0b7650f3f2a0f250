//! Error types for the wiki lookup and batch generation tools.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a generation client for a single request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Provider request failed: {0}")]
    Transport(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl GenerationError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerationError::RateLimited(_))
    }
}

/// Per-item failures. These never abort a batch; the item is recorded as failed.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generation failed for {path:?}: {source}")]
    Generation {
        path: PathBuf,
        #[source]
        source: GenerationError,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ItemError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ItemError::Generation { source, .. } if source.is_rate_limited())
    }
}

/// Whole-batch failures. Returned before any work is dispatched, or when a worker dies.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to enumerate corpus at {root:?}: {source}")]
    Enumeration {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(String),

    #[error("Batch worker terminated abnormally: {0}")]
    WorkerPanicked(String),
}

/// Top-level error for the `wiki` and `wiki-tool` binaries.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Not initialized: {0}. Run `wiki init` first.")]
    NotInitialized(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<config::ConfigError> for WikiError {
    fn from(err: config::ConfigError) -> Self {
        WikiError::Config(err.to_string())
    }
}

impl From<dialoguer::Error> for WikiError {
    fn from(err: dialoguer::Error) -> Self {
        WikiError::Prompt(err.to_string())
    }
}
