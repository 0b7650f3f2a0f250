//! Page repository capability: the git operations the tools need, behind a trait.
//!
//! [`GitCli`] drives the `git` executable with argument vectors.

use crate::error::WikiError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Result of pulling the page repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    Updated,
    UpToDate,
}

/// Git operations on a local page repository.
pub trait PageRepository: Send + Sync {
    /// Clone `url` into `dest`; `depth` requests a shallow clone.
    fn clone_repo(&self, url: &str, dest: &Path, depth: Option<u32>) -> Result<(), WikiError>;

    fn current_branch(&self, repo: &Path) -> Result<String, WikiError>;

    fn checkout(&self, repo: &Path, branch: &str) -> Result<(), WikiError>;

    fn pull(&self, repo: &Path) -> Result<PullOutcome, WikiError>;

    /// Stage every change under `pathspec` (relative to `repo`).
    fn add_all(&self, repo: &Path, pathspec: &Path) -> Result<(), WikiError>;

    fn commit(&self, repo: &Path, message: &str) -> Result<(), WikiError>;

    /// Push local `local_branch` to `origin/<remote_branch>`.
    fn push(&self, repo: &Path, local_branch: &str, remote_branch: &str) -> Result<(), WikiError>;

    /// One-line description of HEAD.
    fn last_commit(&self, repo: &Path) -> Result<String, WikiError>;
}

/// [`PageRepository`] backed by the `git` command.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, repo: Option<&Path>, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(repo) = repo {
            cmd.current_dir(repo);
        }
        cmd.args(args);
        cmd
    }

    /// Run and capture output; non-zero exit becomes an error carrying stderr.
    fn run(&self, repo: Option<&Path>, args: &[&str]) -> Result<String, WikiError> {
        debug!(program = %self.program, ?args, "Running git");
        let output = self
            .command(repo, args)
            .output()
            .map_err(|e| WikiError::Git(format!("failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(WikiError::Git(format!(
                "git {} exited with {}: {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    /// Run with progress shown to the user.
    fn run_inherited(&self, repo: Option<&Path>, args: &[&str]) -> Result<(), WikiError> {
        debug!(program = %self.program, ?args, "Running git");
        let status = self
            .command(repo, args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| WikiError::Git(format!("failed to run {}: {}", self.program, e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(WikiError::Git(format!(
                "git {} exited with {}",
                args.first().copied().unwrap_or_default(),
                status
            )))
        }
    }
}

impl PageRepository for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path, depth: Option<u32>) -> Result<(), WikiError> {
        let dest_str = dest
            .to_str()
            .ok_or_else(|| WikiError::Git(format!("destination is not valid UTF-8: {:?}", dest)))?;
        let depth_str = depth.map(|d| d.to_string());
        let mut args = vec!["clone", "--progress"];
        if let Some(depth) = depth_str.as_deref() {
            args.extend(["--depth", depth]);
        }
        args.extend([url, dest_str]);
        self.run_inherited(None, &args)?;
        info!(url, dest = %dest.display(), "Cloned repository");
        Ok(())
    }

    fn current_branch(&self, repo: &Path) -> Result<String, WikiError> {
        Ok(self
            .run(Some(repo), &["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    fn checkout(&self, repo: &Path, branch: &str) -> Result<(), WikiError> {
        self.run(Some(repo), &["checkout", branch]).map(|_| ())
    }

    fn pull(&self, repo: &Path) -> Result<PullOutcome, WikiError> {
        let stdout = self.run(Some(repo), &["pull", "origin"])?;
        Ok(parse_pull_output(&stdout))
    }

    fn add_all(&self, repo: &Path, pathspec: &Path) -> Result<(), WikiError> {
        let pathspec = pathspec
            .to_str()
            .ok_or_else(|| WikiError::Git(format!("pathspec is not valid UTF-8: {:?}", pathspec)))?;
        self.run(Some(repo), &["add", "--all", "--", pathspec])
            .map(|_| ())
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<(), WikiError> {
        self.run(Some(repo), &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, repo: &Path, local_branch: &str, remote_branch: &str) -> Result<(), WikiError> {
        let refspec = format!("{}:{}", local_branch, remote_branch);
        self.run_inherited(Some(repo), &["push", "origin", &refspec])
    }

    fn last_commit(&self, repo: &Path) -> Result<String, WikiError> {
        Ok(self
            .run(
                Some(repo),
                &["log", "-1", "--format=commit %H%nAuthor: %an <%ae>%nDate:   %ad%n%n    %s"],
            )?
            .trim_end()
            .to_string())
    }
}

fn parse_pull_output(stdout: &str) -> PullOutcome {
    let lower = stdout.to_ascii_lowercase();
    if lower.contains("already up to date") || lower.contains("already up-to-date") {
        PullOutcome::UpToDate
    } else {
        PullOutcome::Updated
    }
}
