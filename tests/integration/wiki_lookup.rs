//! Integration tests for `wiki` lookup, init and update flows

use super::test_utils::{RecordingRepo, ScriptedPrompter, StubClient};
use clap::Parser;
use gptwiki::cli::{WikiCli, WikiContext};
use gptwiki::config::{ConfigLoader, WikiConfig};
use gptwiki::error::WikiError;
use gptwiki::git::PageRepository;
use gptwiki::pages::format_page;
use gptwiki::provider::GenerationClient;
use gptwiki::render::render;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const TAR_REPLY: &str = "tar bundles files into an archive.";

struct Fixture {
    temp: TempDir,
    config: WikiConfig,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = WikiConfig {
            data_dir: Some(temp.path().to_path_buf()),
            user_name: Some("abcdefgh".to_string()),
            ..WikiConfig::default()
        };
        fs::create_dir_all(temp.path().join("wiki_pages")).unwrap();
        Self { temp, config }
    }

    fn pages(&self) -> PathBuf {
        self.temp.path().join("wiki_pages/pages.zh")
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("config/config.toml")
    }

    fn context(
        &self,
        repo: Arc<RecordingRepo>,
        prompter: ScriptedPrompter,
        client: Arc<StubClient>,
    ) -> WikiContext {
        let repo: Arc<dyn PageRepository> = repo;
        let client: Arc<dyn GenerationClient> = client;
        WikiContext::with_parts(
            self.config.clone(),
            self.config_path(),
            repo,
            Box::new(prompter),
            Some(client),
        )
    }
}

async fn run(context: &WikiContext, args: &[&str]) -> (Result<(), WikiError>, String) {
    let cli = WikiCli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let result = context.execute(&cli, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_existing_page_is_rendered_without_generation() {
    let fx = Fixture::new();
    let page = "# tar\n> Archiving utility.\n`tar -xf archive.tar`\n";
    fs::create_dir_all(fx.pages().join("linux")).unwrap();
    fs::write(fx.pages().join("linux/tar.md"), page).unwrap();

    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new(TAR_REPLY));
    let context = fx.context(repo.clone(), ScriptedPrompter::new(&[], &[]), client.clone());

    let (result, out) = run(&context, &["wiki", "tar"]).await;

    result.unwrap();
    assert_eq!(out, render(page, false));
    assert_eq!(client.calls(), 0);
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_missing_page_is_generated_saved_and_pushed() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new(TAR_REPLY));
    let context = fx.context(
        repo.clone(),
        ScriptedPrompter::new(&[true], &[""]),
        client.clone(),
    );

    let (result, out) = run(&context, &["wiki", "tar"]).await;

    result.unwrap();
    assert_eq!(client.subjects(), vec!["tar".to_string()]);
    assert!(out.contains(TAR_REPLY));
    assert!(out.contains("https://github.com/u2takey/gptwiki-pages/pull/new/abcdefgh"));
    assert_eq!(
        fs::read_to_string(fx.pages().join("common/tar.md")).unwrap(),
        format_page("tar", TAR_REPLY)
    );
    assert_eq!(
        repo.calls(),
        vec![
            "add pages.zh/common".to_string(),
            "commit add page [tar], source: [chatgpt]".to_string(),
            "push HEAD:abcdefgh".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_declined_save_leaves_repository_untouched() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new(TAR_REPLY));
    let context = fx.context(repo.clone(), ScriptedPrompter::new(&[false], &[]), client);

    let (result, out) = run(&context, &["wiki", "tar"]).await;

    result.unwrap();
    assert!(out.contains(TAR_REPLY));
    assert!(!fx.pages().join("common/tar.md").exists());
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_multi_word_command_saved_under_chosen_folder() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new("records changes"));
    let context = fx.context(
        repo.clone(),
        ScriptedPrompter::new(&[true], &["linux"]),
        client.clone(),
    );

    let (result, _out) = run(&context, &["wiki", "git", "commit"]).await;

    result.unwrap();
    assert_eq!(client.subjects(), vec!["git commit".to_string()]);
    assert!(fx.pages().join("linux/git commit.md").is_file());
    assert_eq!(repo.calls()[0], "add pages.zh/linux");
}

#[tokio::test]
async fn test_generation_failure_is_reported() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new(TAR_REPLY).fail_on("tar"));
    let context = fx.context(repo.clone(), ScriptedPrompter::new(&[], &[]), client);

    let (result, _out) = run(&context, &["wiki", "tar"]).await;

    assert!(matches!(result, Err(WikiError::Generation(_))));
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_lookup_requires_cloned_repository() {
    let fx = Fixture::new();
    fs::remove_dir_all(fx.temp.path().join("wiki_pages")).unwrap();
    let context = fx.context(
        Arc::new(RecordingRepo::on_branch("main")),
        ScriptedPrompter::new(&[], &[]),
        Arc::new(StubClient::new(TAR_REPLY)),
    );

    let (result, _out) = run(&context, &["wiki", "tar"]).await;

    assert!(matches!(result, Err(WikiError::NotInitialized(_))));
}

#[tokio::test]
async fn test_bare_wiki_prints_usage_and_succeeds() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let client = Arc::new(StubClient::new(TAR_REPLY));
    let context = fx.context(repo.clone(), ScriptedPrompter::new(&[], &[]), client.clone());

    let (result, out) = run(&context, &["wiki"]).await;

    result.unwrap();
    assert!(out.starts_with("Usage: wiki <command>"));
    assert_eq!(client.calls(), 0);
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_update_switches_to_main_and_pulls() {
    let fx = Fixture::new();
    let repo = Arc::new(RecordingRepo::on_branch("abcdefgh"));
    let context = fx.context(
        repo.clone(),
        ScriptedPrompter::new(&[], &[]),
        Arc::new(StubClient::new(TAR_REPLY)),
    );

    let (result, out) = run(&context, &["wiki", "update"]).await;

    result.unwrap();
    assert_eq!(
        repo.calls(),
        vec!["checkout main".to_string(), "pull".to_string()]
    );
    assert!(out.contains("Pages already up to date"));
    assert!(out.contains("commit abc123"));
}

#[tokio::test]
async fn test_init_persists_config_and_clones_once() {
    let temp = TempDir::new().unwrap();
    let config = WikiConfig {
        data_dir: Some(temp.path().to_path_buf()),
        ..WikiConfig::default()
    };
    let config_path = temp.path().join("config/config.toml");
    let repo = Arc::new(RecordingRepo::on_branch("main"));
    let shared: Arc<dyn PageRepository> = repo.clone();
    let context = WikiContext::with_parts(
        config,
        config_path.clone(),
        shared,
        Box::new(ScriptedPrompter::new(&[], &[])),
        None,
    );

    let (result, out) = run(
        &context,
        &["wiki", "init", "--api-key", "sk-test", "--folder", "linux", "--lang", ""],
    )
    .await;

    result.unwrap();
    assert!(out.contains("Cloned page repository"));
    assert_eq!(
        repo.calls(),
        vec!["clone git@github.com:u2takey/gptwiki-pages.git depth=None".to_string()]
    );

    let saved = ConfigLoader::load_from(&config_path).unwrap();
    assert_eq!(saved.api_key.as_deref(), Some("sk-test"));
    assert_eq!(saved.folder, "linux");
    assert_eq!(saved.pages_dir(), "pages");
    assert_eq!(
        saved.effective_prompt(),
        "Please explain the command in detail: %s"
    );
    let user_name = saved.user_name.unwrap();
    assert_eq!(user_name.len(), 8);
    assert!(user_name.chars().all(|c| c.is_ascii_lowercase()));

    // A second init keeps the clone.
    let (result, out) = run(&context, &["wiki", "init"]).await;
    result.unwrap();
    assert!(out.contains("Page repository present"));
    assert_eq!(repo.calls().len(), 1);
}
