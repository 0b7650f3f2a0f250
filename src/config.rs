//! Configuration System
//!
//! User configuration for both binaries: provider credentials, page folder and language,
//! prompt template, repository locations and logging. Loaded from defaults, then the user
//! config file, then `GPTWIKI_*` environment variables. `wiki init` persists it as TOML.
//! All paths the tools touch are derived from a loaded [`WikiConfig`] value.

use crate::error::WikiError;
use crate::logging::LoggingConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

mod defaults;
mod sources;

pub use defaults::{default_prompt, DEFAULT_FOLDER, DEFAULT_LANG, PROMPT_EN, PROMPT_ZH};
pub use sources::user_config_path;

const WIKI_DIR_NAME: &str = "wiki_pages";
const CORPUS_DIR_NAME: &str = "tldr";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiConfig {
    /// API key for the generation provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Platform folder pages are saved under (common, linux, osx, ...)
    #[serde(default = "default_folder")]
    pub folder: String,

    /// Page language suffix; empty selects the untranslated `pages` directory
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Prompt template with a single `%s` slot for the command
    #[serde(default)]
    pub prompt: Option<String>,

    /// Random branch name used when pushing pages upstream
    #[serde(default)]
    pub user_name: Option<String>,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding the page repository and reference corpus (defaults to home)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_wiki_repo_url")]
    pub wiki_repo_url: String,

    #[serde(default = "default_corpus_repo_url")]
    pub corpus_repo_url: String,

    /// Prefix for "open a pull request" links, followed by the branch name
    #[serde(default = "default_pull_request_base")]
    pub pull_request_base: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_folder() -> String {
    defaults::DEFAULT_FOLDER.to_string()
}

fn default_lang() -> String {
    defaults::DEFAULT_LANG.to_string()
}

fn default_model() -> String {
    defaults::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    defaults::DEFAULT_BASE_URL.to_string()
}

fn default_wiki_repo_url() -> String {
    defaults::DEFAULT_WIKI_REPO_URL.to_string()
}

fn default_corpus_repo_url() -> String {
    defaults::DEFAULT_CORPUS_REPO_URL.to_string()
}

fn default_pull_request_base() -> String {
    defaults::DEFAULT_PULL_REQUEST_BASE.to_string()
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            folder: default_folder(),
            lang: default_lang(),
            prompt: None,
            user_name: None,
            model: default_model(),
            base_url: default_base_url(),
            data_dir: None,
            wiki_repo_url: default_wiki_repo_url(),
            corpus_repo_url: default_corpus_repo_url(),
            pull_request_base: default_pull_request_base(),
            logging: LoggingConfig::default(),
        }
    }
}

impl WikiConfig {
    /// `pages` for the untranslated corpus, `pages.<lang>` otherwise.
    pub fn pages_dir(&self) -> String {
        if self.lang.is_empty() {
            "pages".to_string()
        } else {
            format!("pages.{}", self.lang)
        }
    }

    /// Configured prompt, or the language default when unset or blank.
    pub fn effective_prompt(&self) -> String {
        match self.prompt.as_deref().map(str::trim) {
            Some(prompt) if !prompt.is_empty() => prompt.to_string(),
            _ => default_prompt(&self.lang).to_string(),
        }
    }

    /// Base directory for the page repository and corpus.
    pub fn data_root(&self) -> Result<PathBuf, WikiError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| WikiError::Config("Unable to determine home directory".to_string()))
    }

    /// Local clone of the page repository.
    pub fn wiki_path(&self) -> Result<PathBuf, WikiError> {
        Ok(self.data_root()?.join(WIKI_DIR_NAME))
    }

    /// Local clone of the reference corpus used by batch generation.
    pub fn corpus_path(&self) -> Result<PathBuf, WikiError> {
        Ok(self.data_root()?.join(CORPUS_DIR_NAME))
    }

    pub fn require_api_key(&self) -> Result<&str, WikiError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(WikiError::Config(
                "API key not configured; run `wiki init --api-key <key>` or set GPTWIKI_API_KEY"
                    .to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<(), WikiError> {
        if self.folder.trim().is_empty() {
            return Err(WikiError::Config("Folder cannot be empty".to_string()));
        }
        if self.folder.contains(['/', '\\']) || self.folder == ".." {
            return Err(WikiError::Config(format!(
                "Folder must be a single directory name, got '{}'",
                self.folder
            )));
        }
        if self.model.trim().is_empty() {
            return Err(WikiError::Config("Model cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(WikiError::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Random lowercase name used as the push branch for one user.
pub fn generate_user_name() -> String {
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}

/// Loads and persists [`WikiConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the config file location: explicit path, else the user config path.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, WikiError> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => user_config_path().ok_or_else(|| {
                WikiError::Config("Unable to determine user config directory".to_string())
            }),
        }
    }

    /// Load configuration layered as defaults, file at `path` (if present), environment.
    pub fn load_from(path: &Path) -> Result<WikiConfig, WikiError> {
        let builder = defaults::builder_with_defaults()?;
        let builder = sources::add_file(builder, path)?;
        let builder = sources::add_env(builder);
        let config: WikiConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`ConfigLoader::load_from`], but the file must exist.
    pub fn load_required(path: &Path) -> Result<WikiConfig, WikiError> {
        if !path.exists() {
            return Err(WikiError::NotInitialized(format!(
                "config file {} not found",
                path.display()
            )));
        }
        Self::load_from(path)
    }

    /// Persist configuration as TOML (temp file + rename).
    pub fn save(config: &WikiConfig, path: &Path) -> Result<(), WikiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(config)
            .map_err(|e| WikiError::Config(format!("Failed to serialize config: {}", e)))?;
        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, serialized)?;
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(WikiError::Io(e));
        }
        info!(config_path = %path.display(), "Saved configuration");
        Ok(())
    }
}
