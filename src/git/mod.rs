//! Git operations
//!
//! - [Git]: the version-control commands the workflows issue, run through a
//!   [Spawner] so they are logged and can be scripted in tests
//! - [repository]: read-only repository inspection with `git2`
//! - [guard]: the clean / pushed / pulled synchronization checks

pub mod guard;
pub mod repository;

pub use guard::GitGuard;

use crate::error::Result;
use crate::process::Spawner;
use crate::ui::ReplayLogger;

pub const REMOTE: &str = "origin";

const GIT: &str = "git";

/// Git command-line wrapper bound to a project directory
#[derive(Clone, Copy)]
pub struct Git<'a> {
    spawner: Spawner<'a>,
}

impl<'a> Git<'a> {
    pub fn new(spawner: Spawner<'a>) -> Self {
        Git { spawner }
    }

    pub fn logger(&self) -> &'a ReplayLogger {
        self.spawner.logger()
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        Ok(self.spawner.spawn(GIT, args)?.stdout)
    }

    /// `git status --porcelain`; empty when the workspace is clean
    pub fn status_porcelain(&self) -> Result<String> {
        self.run(&["status", "--porcelain"])
    }

    /// `git cherry -v`; lists commits not yet pushed upstream
    pub fn unpushed_commits(&self) -> Result<String> {
        self.run(&["cherry", "-v"])
    }

    pub fn fetch(&self) -> Result<()> {
        self.run(&["fetch", REMOTE]).map(drop)
    }

    /// Commits on the remote tracking branch that are not in HEAD
    pub fn unpulled_commits(&self, branch: &str) -> Result<String> {
        let range = format!("HEAD..{}/{}", REMOTE, branch);
        self.run(&["log", &range, "--oneline"])
    }

    pub fn head_commit(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Commit a tag points to, or `None` when the tag does not exist
    pub fn tag_commit(&self, tag: &str) -> Result<Option<String>> {
        let revspec = format!("{}^{{commit}}", tag);
        let output = self.spawner.try_spawn(GIT, &["rev-parse", "--verify", &revspec])?;
        if !output.success() {
            return Ok(None);
        }
        let sha = output.stdout.trim();
        Ok((!sha.is_empty()).then(|| sha.to_string()))
    }

    pub fn create_tag(&self, tag: &str) -> Result<()> {
        self.run(&["tag", tag]).map(drop)
    }

    pub fn push_tags(&self, branch: &str) -> Result<()> {
        self.run(&["push", "--tags", REMOTE, branch]).map(drop)
    }

    pub fn push(&self, branch: &str) -> Result<()> {
        self.run(&["push", REMOTE, branch]).map(drop)
    }

    /// Push a new branch and set its upstream
    pub fn push_upstream(&self, branch: &str) -> Result<()> {
        self.run(&["push", "-u", REMOTE, branch]).map(drop)
    }

    pub fn pull(&self, branch: &str) -> Result<()> {
        self.run(&["pull", REMOTE, branch]).map(drop)
    }

    pub fn create_branch(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch]).map(drop)
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(drop)
    }

    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-a", "-m", message]).map(drop)
    }

    /// Discard tracked changes and remove untracked files and directories
    pub fn reset_workspace(&self) -> Result<()> {
        self.run(&["reset", "--hard", "HEAD"])?;
        self.run(&["clean", "-df"]).map(drop)
    }
}
