//! Corpus enumeration: every file under a reference-page root.

use crate::error::BatchError;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively list files under `root`, sorted by path.
///
/// Directories are skipped and symlinks are followed. An unreadable or missing root
/// fails the whole enumeration; an unreadable entry below it is logged and skipped.
pub fn enumerate(root: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(BatchError::Enumeration {
                    root: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable corpus entry"
                );
                continue;
            }
        };
        if entry.file_type().is_file() {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}
