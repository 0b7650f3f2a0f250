//! Shared test doubles: scripted generation client, recording page repository,
//! scripted prompter, and corpus fixtures.

use async_trait::async_trait;
use gptwiki::cli::Prompter;
use gptwiki::error::{GenerationError, WikiError};
use gptwiki::git::{PageRepository, PullOutcome};
use gptwiki::provider::GenerationClient;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Generation client answering from a script and recording every call.
pub struct StubClient {
    reply: String,
    rate_limited: HashSet<String>,
    failing: HashSet<String>,
    empty: HashSet<String>,
    delay: Duration,
    cancel_after: Option<(usize, CancellationToken)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    subjects: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            rate_limited: HashSet::new(),
            failing: HashSet::new(),
            empty: HashSet::new(),
            delay: Duration::ZERO,
            cancel_after: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            subjects: Mutex::new(Vec::new()),
        }
    }

    pub fn rate_limit(mut self, subject: &str) -> Self {
        self.rate_limited.insert(subject.to_string());
        self
    }

    pub fn fail_on(mut self, subject: &str) -> Self {
        self.failing.insert(subject.to_string());
        self
    }

    pub fn empty_on(mut self, subject: &str) -> Self {
        self.empty.insert(subject.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cancel `token` once the `n`th call completes.
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn subjects(&self) -> Vec<String> {
        self.subjects.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    async fn generate(
        &self,
        _prompt_template: &str,
        subject: &str,
    ) -> Result<String, GenerationError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.subjects.lock().push(subject.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, ref token)) = self.cancel_after {
            if call >= n {
                token.cancel();
            }
        }

        if self.rate_limited.contains(subject) {
            return Err(GenerationError::RateLimited("429 Too Many Requests".to_string()));
        }
        if self.failing.contains(subject) {
            return Err(GenerationError::Transport("connection reset".to_string()));
        }
        if self.empty.contains(subject) {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(self.reply.clone())
    }
}

/// Page repository that records calls instead of running git.
#[derive(Default)]
pub struct RecordingRepo {
    pub branch: Mutex<String>,
    pub calls: Mutex<Vec<String>>,
    pub pull_outcome: Option<PullOutcome>,
}

impl RecordingRepo {
    pub fn on_branch(branch: &str) -> Self {
        Self {
            branch: Mutex::new(branch.to_string()),
            calls: Mutex::new(Vec::new()),
            pull_outcome: Some(PullOutcome::UpToDate),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl PageRepository for RecordingRepo {
    fn clone_repo(&self, url: &str, dest: &Path, depth: Option<u32>) -> Result<(), WikiError> {
        fs::create_dir_all(dest)?;
        self.calls
            .lock()
            .push(format!("clone {} depth={:?}", url, depth));
        Ok(())
    }

    fn current_branch(&self, _repo: &Path) -> Result<String, WikiError> {
        Ok(self.branch.lock().clone())
    }

    fn checkout(&self, _repo: &Path, branch: &str) -> Result<(), WikiError> {
        *self.branch.lock() = branch.to_string();
        self.calls.lock().push(format!("checkout {}", branch));
        Ok(())
    }

    fn pull(&self, _repo: &Path) -> Result<PullOutcome, WikiError> {
        self.calls.lock().push("pull".to_string());
        Ok(self.pull_outcome.unwrap_or(PullOutcome::Updated))
    }

    fn add_all(&self, _repo: &Path, pathspec: &Path) -> Result<(), WikiError> {
        self.calls
            .lock()
            .push(format!("add {}", pathspec.display()));
        Ok(())
    }

    fn commit(&self, _repo: &Path, message: &str) -> Result<(), WikiError> {
        self.calls.lock().push(format!("commit {}", message));
        Ok(())
    }

    fn push(&self, _repo: &Path, local_branch: &str, remote_branch: &str) -> Result<(), WikiError> {
        self.calls
            .lock()
            .push(format!("push {}:{}", local_branch, remote_branch));
        Ok(())
    }

    fn last_commit(&self, _repo: &Path) -> Result<String, WikiError> {
        Ok("commit abc123\n\n    add page [tar]".to_string())
    }
}

/// Prompter replaying canned answers.
pub struct ScriptedPrompter {
    confirms: Mutex<VecDeque<bool>>,
    inputs: Mutex<VecDeque<String>>,
}

impl ScriptedPrompter {
    pub fn new(confirms: &[bool], inputs: &[&str]) -> Self {
        Self {
            confirms: Mutex::new(confirms.iter().copied().collect()),
            inputs: Mutex::new(inputs.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _question: &str) -> Result<bool, WikiError> {
        self.confirms
            .lock()
            .pop_front()
            .ok_or_else(|| WikiError::Prompt("unexpected confirm".to_string()))
    }

    fn input(&self, _question: &str, default: &str) -> Result<String, WikiError> {
        Ok(self
            .inputs
            .lock()
            .pop_front()
            .filter(|answer| !answer.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }
}

/// Write `pages` (file name, content) into `dir`, returning their paths.
pub fn write_pages(dir: &Path, pages: &[(&str, &str)]) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    pages
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

/// A corpus of `n` pages named `cmd000.md`, `cmd001.md`, ...
pub fn write_numbered_corpus(dir: &Path, n: usize) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    (0..n)
        .map(|i| {
            let path = dir.join(format!("cmd{:03}.md", i));
            fs::write(&path, format!("# cmd{:03}\n> does thing {}\n", i, i)).unwrap();
            path
        })
        .collect()
}
