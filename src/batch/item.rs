//! Item processor: turns one reference page into one generated wiki page.
//!
//! Reads the source, derives the title and body, applies the skip-if-exists policy,
//! calls the generation client and writes the combined page atomically.

use crate::error::ItemError;
use crate::provider::GenerationClient;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Terminal state of one processed item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Page generated and written to the target path
    Written(PathBuf),
    /// Target already existed and override is off; nothing generated
    Skipped(PathBuf),
    /// No output produced
    Failed(ItemError),
}

/// Unit of work the dispatcher runs once per enumerated item.
#[async_trait]
pub trait ProcessItem: Send + Sync + 'static {
    async fn process(&self, source: &Path) -> ItemOutcome;
}

/// Title and body split out of a reference page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePage {
    /// First line exactly as it appears in the source
    pub title_line: String,
    /// First line with surrounding `#` and spaces removed
    pub title: String,
    /// Everything after the first line
    pub body: String,
}

impl SourcePage {
    pub fn parse(content: &str) -> Self {
        let (title_line, body) = match content.split_once('\n') {
            Some((first, rest)) => (first, rest),
            None => (content, ""),
        };
        Self {
            title_line: title_line.to_string(),
            title: title_line.trim_matches(|c| c == '#' || c == ' ').to_string(),
            body: body.to_string(),
        }
    }

    /// Combined page: original title, generated section, then the reference section.
    pub fn compose(&self, generated: &str) -> String {
        format!(
            "{} \n## chatgpt \n{} \n\n## tldr \n {}",
            self.title_line, generated, self.body
        )
    }
}

/// Target for a source file: same file name inside the output folder.
pub fn target_path(output_dir: &Path, source: &Path) -> Option<PathBuf> {
    source.file_name().map(|name| output_dir.join(name))
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
pub async fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"))?;
    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, contents).await?;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}

/// Generates one wiki page per reference page.
pub struct ItemProcessor {
    client: Arc<dyn GenerationClient>,
    output_dir: PathBuf,
    prompt: String,
    override_existing: bool,
}

impl ItemProcessor {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        output_dir: PathBuf,
        prompt: String,
        override_existing: bool,
    ) -> Self {
        Self {
            client,
            output_dir,
            prompt,
            override_existing,
        }
    }

    async fn process_inner(&self, source: &Path) -> Result<Option<PathBuf>, ItemError> {
        let bytes = tokio::fs::read(source).await.map_err(|e| ItemError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        let page = SourcePage::parse(&String::from_utf8_lossy(&bytes));

        let target = target_path(&self.output_dir, source).ok_or_else(|| ItemError::Write {
            path: source.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        })?;

        let exists = tokio::fs::try_exists(&target)
            .await
            .map_err(|e| ItemError::Write {
                path: target.clone(),
                source: e,
            })?;
        if !self.override_existing && exists {
            debug!(path = %source.display(), target = %target.display(), "Target exists, skipping");
            return Ok(None);
        }

        let generated = self
            .client
            .generate(&self.prompt, &page.title)
            .await
            .map_err(|e| ItemError::Generation {
                path: source.to_path_buf(),
                source: e,
            })?;

        write_atomic(&target, &page.compose(&generated))
            .await
            .map_err(|e| ItemError::Write {
                path: target.clone(),
                source: e,
            })?;

        Ok(Some(target))
    }
}

#[async_trait]
impl ProcessItem for ItemProcessor {
    async fn process(&self, source: &Path) -> ItemOutcome {
        match self.process_inner(source).await {
            Ok(Some(target)) => ItemOutcome::Written(target),
            Ok(None) => ItemOutcome::Skipped(
                target_path(&self.output_dir, source).unwrap_or_else(|| source.to_path_buf()),
            ),
            Err(e) => ItemOutcome::Failed(e),
        }
    }
}
