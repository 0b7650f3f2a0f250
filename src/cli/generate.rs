//! CLI route for `wiki-tool`: prepares repositories and runs the batch job.

use crate::batch::{run_batch, BatchOptions, BatchReport};
use crate::cli::parse::ToolCommands;
use crate::cli::presentation;
use crate::cli::route::{apply_init_args, ensure_clone};
use crate::cli::tool_command_name;
use crate::config::{ConfigLoader, WikiConfig};
use crate::error::WikiError;
use crate::git::{GitCli, PageRepository};
use crate::provider::{GenerationClient, OpenAiClient};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The corpus only needs its latest snapshot.
const CORPUS_CLONE_DEPTH: u32 = 1;

/// Runtime context for `wiki-tool`.
pub struct ToolContext {
    config: WikiConfig,
    repo: Arc<dyn PageRepository>,
    client: Option<Arc<dyn GenerationClient>>,
}

impl ToolContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, WikiError> {
        let config_path = ConfigLoader::resolve_path(config_path.as_deref())?;
        let config = ConfigLoader::load_from(&config_path)?;
        Ok(Self::with_parts(config, Arc::new(GitCli::new()), None))
    }

    pub fn with_parts(
        config: WikiConfig,
        repo: Arc<dyn PageRepository>,
        client: Option<Arc<dyn GenerationClient>>,
    ) -> Self {
        Self {
            config,
            repo,
            client,
        }
    }

    /// Run the parsed command. `cancel` stops the batch between items.
    pub async fn execute(
        &self,
        command: &ToolCommands,
        cancel: CancellationToken,
    ) -> Result<String, WikiError> {
        info!(command = tool_command_name(command), "Executing command");
        match command {
            ToolCommands::Init {
                args,
                override_existing,
                worker,
                cooldown_secs,
                format,
            } => {
                let mut config = self.config.clone();
                apply_init_args(&mut config, args);
                config.validate()?;

                let options = BatchOptions {
                    workers: *worker,
                    override_existing: *override_existing,
                    prompt: config.effective_prompt(),
                    cooldown: Duration::from_secs(*cooldown_secs),
                };
                let report = self.generate_all(&config, &options, cancel).await?;
                presentation::format_batch_report(&report, *format)
            }
        }
    }

    async fn generate_all(
        &self,
        config: &WikiConfig,
        options: &BatchOptions,
        cancel: CancellationToken,
    ) -> Result<BatchReport, WikiError> {
        // Reject bad worker counts and prompts before cloning anything.
        options.validate()?;

        let pages_dir = config.pages_dir();
        info!(pages = %pages_dir, folder = %config.folder, "Starting batch generation");

        let wiki_path = config.wiki_path()?;
        ensure_clone(self.repo.as_ref(), &config.wiki_repo_url, &wiki_path, None)?;
        let corpus_path = config.corpus_path()?;
        ensure_clone(
            self.repo.as_ref(),
            &config.corpus_repo_url,
            &corpus_path,
            Some(CORPUS_CLONE_DEPTH),
        )?;

        let output_dir = wiki_path.join(&pages_dir).join(&config.folder);
        fs::create_dir_all(&output_dir)?;
        let corpus_root = corpus_path.join(&pages_dir).join(&config.folder);

        let client = match &self.client {
            Some(client) => Arc::clone(client),
            None => Arc::new(OpenAiClient::from_config(config)?),
        };

        let report = run_batch(&corpus_root, output_dir, options, client, cancel).await?;
        for path in &report.failed {
            warn!(path = %path.display(), "Item failed");
        }
        info!(
            total = report.total,
            written = report.written,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Batch generation finished"
        );
        Ok(report)
    }
}
