//! CLI route for `wiki`: run context and dispatch for lookup, init and update.

use crate::cli::parse::{InitArgs, WikiCli, WikiCommands};
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::cli::{command_name, presentation};
use crate::config::{generate_user_name, ConfigLoader, WikiConfig};
use crate::error::WikiError;
use crate::git::{GitCli, PageRepository};
use crate::pages::PageStore;
use crate::provider::{GenerationClient, OpenAiClient};
use crate::render::render;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const MAIN_BRANCH: &str = "main";

/// Fold `init` flags into a configuration.
pub(crate) fn apply_init_args(config: &mut WikiConfig, args: &InitArgs) {
    if let Some(ref key) = args.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(ref folder) = args.folder {
        config.folder = folder.clone();
    }
    if let Some(ref lang) = args.lang {
        config.lang = lang.clone();
    }
    if let Some(ref prompt) = args.prompt {
        config.prompt = Some(prompt.clone());
    }
}

/// Runtime context for `wiki`: loaded config plus the collaborators each command needs.
pub struct WikiContext {
    config: WikiConfig,
    config_path: PathBuf,
    repo: Arc<dyn PageRepository>,
    prompter: Box<dyn Prompter>,
    client: Option<Arc<dyn GenerationClient>>,
    color: bool,
}

impl WikiContext {
    /// Load configuration from `config_path` (or the user config path) and wire up
    /// the git-backed repository and terminal prompts.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, WikiError> {
        let config_path = ConfigLoader::resolve_path(config_path.as_deref())?;
        let config = ConfigLoader::load_from(&config_path)?;
        Ok(Self::with_parts(
            config,
            config_path,
            Arc::new(GitCli::new()),
            Box::new(TerminalPrompter),
            None,
        ))
    }

    /// Build from explicit parts. Without a `client`, one is created from the config
    /// on first use.
    pub fn with_parts(
        config: WikiConfig,
        config_path: PathBuf,
        repo: Arc<dyn PageRepository>,
        prompter: Box<dyn Prompter>,
        client: Option<Arc<dyn GenerationClient>>,
    ) -> Self {
        Self {
            config,
            config_path,
            repo,
            prompter,
            client,
            color: false,
        }
    }

    /// Style rendered pages for a terminal.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Run the parsed command, writing user-facing text to `out`.
    pub async fn execute(&self, cli: &WikiCli, out: &mut dyn Write) -> Result<(), WikiError> {
        let started = Instant::now();
        let command = command_name(cli);
        debug!(command, "Executing command");

        let result = match &cli.command {
            Some(WikiCommands::Init { args }) => self.handle_init(args, out),
            Some(WikiCommands::Update) => self.handle_update(out),
            None => self.handle_lookup(&cli.words.join(" "), out).await,
        };

        match &result {
            Ok(()) => info!(
                command,
                duration_ms = started.elapsed().as_millis() as u64,
                "Command completed"
            ),
            Err(e) => warn!(command, error = %e, "Command failed"),
        }
        result
    }

    fn handle_init(&self, args: &InitArgs, out: &mut dyn Write) -> Result<(), WikiError> {
        let mut config = self.config.clone();
        apply_init_args(&mut config, args);
        if config.user_name.is_none() {
            config.user_name = Some(generate_user_name());
        }
        config.validate()?;
        ConfigLoader::save(&config, &self.config_path)?;

        let wiki_path = config.wiki_path()?;
        let cloned = ensure_clone(
            self.repo.as_ref(),
            &config.wiki_repo_url,
            &wiki_path,
            None,
        )?;

        writeln!(
            out,
            "{}",
            presentation::format_init_summary(&config, &self.config_path, &wiki_path, cloned)
        )?;
        Ok(())
    }

    fn handle_update(&self, out: &mut dyn Write) -> Result<(), WikiError> {
        let wiki_path = self.initialized_wiki_path()?;

        let branch = self.repo.current_branch(&wiki_path)?;
        if branch != MAIN_BRANCH {
            info!(from = %branch, to = MAIN_BRANCH, "Switching branch before update");
            self.repo.checkout(&wiki_path, MAIN_BRANCH)?;
        }

        let outcome = self.repo.pull(&wiki_path)?;
        let last_commit = self.repo.last_commit(&wiki_path)?;
        writeln!(
            out,
            "{}",
            presentation::format_update_summary(outcome, &last_commit)
        )?;
        Ok(())
    }

    async fn handle_lookup(&self, command: &str, out: &mut dyn Write) -> Result<(), WikiError> {
        let command = command.trim();
        if command.is_empty() {
            writeln!(out, "{}", presentation::format_usage_hint())?;
            return Ok(());
        }

        let wiki_path = self.initialized_wiki_path()?;
        let store = PageStore::new(&wiki_path, &self.config.pages_dir());

        if let Some(path) = store.find(command)? {
            info!(command, path = %path.display(), "Page found");
            let text = store.read(&path)?;
            write!(out, "{}", render(&text, self.color))?;
            return Ok(());
        }

        writeln!(
            out,
            "No page for '{}' yet, asking {}...",
            command, self.config.model
        )?;
        out.flush()?;

        let client = self.client()?;
        let generated = client
            .generate(&self.config.effective_prompt(), command)
            .await?;
        write!(out, "{}", render(&generated, self.color))?;
        out.flush()?;

        if !self.prompter.confirm("save this page upstream?")? {
            return Ok(());
        }

        let folder = self
            .prompter
            .input("platform folder (common, linux, osx, windows...)", &self.config.folder)?;
        if folder.contains(['/', '\\']) || folder == ".." {
            return Err(WikiError::Config(format!(
                "Folder must be a single directory name, got '{}'",
                folder
            )));
        }
        let saved = store.save(&folder, command, &generated)?;
        info!(command, path = %saved.display(), "Saved page");

        let user_name = self.config.user_name.as_deref().ok_or_else(|| {
            WikiError::NotInitialized("no user name in configuration".to_string())
        })?;
        let pathspec = Path::new(&self.config.pages_dir()).join(&folder);
        self.repo.add_all(&wiki_path, &pathspec)?;
        self.repo
            .commit(&wiki_path, &format!("add page [{}], source: [chatgpt]", command))?;
        self.repo.push(&wiki_path, "HEAD", user_name)?;

        writeln!(
            out,
            "{}",
            presentation::format_pull_request_hint(&self.config.pull_request_base, user_name)
        )?;
        Ok(())
    }

    fn initialized_wiki_path(&self) -> Result<PathBuf, WikiError> {
        let wiki_path = self.config.wiki_path()?;
        if !wiki_path.is_dir() {
            return Err(WikiError::NotInitialized(format!(
                "page repository {} not found",
                wiki_path.display()
            )));
        }
        Ok(wiki_path)
    }

    fn client(&self) -> Result<Arc<dyn GenerationClient>, WikiError> {
        match &self.client {
            Some(client) => Ok(Arc::clone(client)),
            None => Ok(Arc::new(OpenAiClient::from_config(&self.config)?)),
        }
    }
}

/// Clone `url` into `dest` unless it already exists. Returns whether a clone happened.
pub(crate) fn ensure_clone(
    repo: &dyn PageRepository,
    url: &str,
    dest: &Path,
    depth: Option<u32>,
) -> Result<bool, WikiError> {
    if dest.exists() {
        debug!(dest = %dest.display(), "Repository already present");
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    repo.clone_repo(url, dest, depth)?;
    Ok(true)
}
