//! Page store: lookup and saving of command pages inside the local page repository.
//!
//! Layout: `<wiki root>/<pages dir>/<platform folder>/<command>.md`.

use crate::error::WikiError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const PAGE_EXTENSION: &str = "md";

/// Command pages for one language directory.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Store rooted at `<wiki_root>/<pages_dir>`.
    pub fn new(wiki_root: &Path, pages_dir: &str) -> Self {
        Self {
            root: wiki_root.join(pages_dir),
        }
    }

    /// Path a page for `command` would have under `folder`.
    pub fn page_path(&self, folder: &str, command: &str) -> PathBuf {
        self.root
            .join(folder)
            .join(format!("{}.{}", command, PAGE_EXTENSION))
    }

    /// Find `command` in any platform folder, searching folders in name order.
    /// A missing pages directory means no page.
    pub fn find(&self, command: &str) -> Result<Option<PathBuf>, WikiError> {
        validate_command(command)?;
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WikiError::Io(e)),
        };

        let mut folders = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                folders.push(entry.file_name());
            }
        }
        folders.sort();

        for folder in folders {
            let candidate = self
                .root
                .join(&folder)
                .join(format!("{}.{}", command, PAGE_EXTENSION));
            if candidate.is_file() {
                debug!(path = %candidate.display(), "Found page");
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    pub fn read(&self, path: &Path) -> Result<String, WikiError> {
        Ok(fs::read_to_string(path)?)
    }

    /// Write a generated page for `command` under `folder`, replacing any existing one.
    pub fn save(&self, folder: &str, command: &str, text: &str) -> Result<PathBuf, WikiError> {
        validate_command(command)?;
        let path = self.page_path(folder, command);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("md.tmp");
        fs::write(&temp_path, format_page(command, text))?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(WikiError::Io(e));
        }
        Ok(path)
    }
}

/// Page body for an interactively generated page.
pub fn format_page(command: &str, text: &str) -> String {
    format!("#{} \n## chatgpt \n{}", command, text)
}

fn validate_command(command: &str) -> Result<(), WikiError> {
    if command.trim().is_empty()
        || command.contains(['/', '\\'])
        || command.split_whitespace().any(|part| part == "..")
    {
        return Err(WikiError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid command name '{}'", command),
        )));
    }
    Ok(())
}
