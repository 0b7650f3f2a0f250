//! CLI parse: clap types for `wiki` and `wiki-tool`. No behavior; definitions only.

use crate::logging::LoggingConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Flags shared by both binaries.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file path (default: $XDG_CONFIG_HOME/gptwiki/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

impl GlobalArgs {
    /// Fold CLI flags over a logging config loaded from file.
    pub fn apply_logging(&self, config: &mut LoggingConfig) {
        if self.quiet {
            config.enabled = false;
        }
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(ref level) = self.log_level {
            config.level = level.clone();
        }
        if let Some(ref format) = self.log_format {
            config.format = format.clone();
        }
        if let Some(ref output) = self.log_output {
            config.output = output.clone();
        }
    }
}

/// Wiki - look up command pages, asking an LLM when no page exists
#[derive(Parser, Debug)]
#[command(name = "wiki")]
#[command(version, about = "Command wiki lookup with LLM generated pages")]
#[command(args_conflicts_with_subcommands = true)]
pub struct WikiCli {
    #[command(subcommand)]
    pub command: Option<WikiCommands>,

    /// Command to look up, e.g. `wiki git commit`
    #[arg(trailing_var_arg = true)]
    pub words: Vec<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Settings written by `init`.
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// API key for the generation provider
    #[arg(long = "api-key", alias = "chatgpt-key")]
    pub api_key: Option<String>,

    /// Platform folder for saved pages (common, linux, osx, ...)
    #[arg(long)]
    pub folder: Option<String>,

    /// Page language; pass an empty string for the untranslated pages
    #[arg(long)]
    pub lang: Option<String>,

    /// Prompt template with one %s slot for the command
    #[arg(long)]
    pub prompt: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum WikiCommands {
    /// Save configuration and clone the page repository
    Init {
        #[command(flatten)]
        args: InitArgs,
    },
    /// Pull the latest pages
    Update,
}

/// Wiki tool - bulk generate pages from the reference corpus
#[derive(Parser, Debug)]
#[command(name = "wiki-tool")]
#[command(version, about = "Bulk generate wiki pages from the tldr corpus")]
pub struct ToolCli {
    #[command(subcommand)]
    pub command: ToolCommands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Output format for the batch report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ToolCommands {
    /// Clone repositories and generate a page for every corpus entry
    Init {
        #[command(flatten)]
        args: InitArgs,

        /// Regenerate pages that already exist
        #[arg(long = "override")]
        override_existing: bool,

        /// Number of concurrent workers
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        worker: i64,

        /// Seconds a worker pauses after a rate-limited request
        #[arg(long, default_value_t = 60)]
        cooldown_secs: u64,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}
