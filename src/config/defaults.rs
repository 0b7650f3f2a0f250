//! Merge rules: defaults applied before any file or environment source.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_FOLDER: &str = "common";
pub const DEFAULT_LANG: &str = "zh";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WIKI_REPO_URL: &str = "git@github.com:u2takey/gptwiki-pages.git";
pub const DEFAULT_CORPUS_REPO_URL: &str = "git@github.com:tldr-pages/tldr.git";
pub const DEFAULT_PULL_REQUEST_BASE: &str = "https://github.com/u2takey/gptwiki-pages/pull/new";

pub const PROMPT_ZH: &str = "请详细解释命令：%s";
pub const PROMPT_EN: &str = "Please explain the command in detail: %s";

/// Create a Config builder with defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("folder", DEFAULT_FOLDER)?
        .set_default("lang", DEFAULT_LANG)?
        .set_default("model", DEFAULT_MODEL)?
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("wiki_repo_url", DEFAULT_WIKI_REPO_URL)?
        .set_default("corpus_repo_url", DEFAULT_CORPUS_REPO_URL)?
        .set_default("pull_request_base", DEFAULT_PULL_REQUEST_BASE)
}

/// Prompt used when none is configured.
pub fn default_prompt(lang: &str) -> &'static str {
    if lang == "zh" {
        PROMPT_ZH
    } else {
        PROMPT_EN
    }
}
