use super::Git;
use crate::error::{ReleaseError, Result};

/// Checks that the workspace is clean and in sync with the remote branch
///
/// The three checks run in order and stop at the first failure:
/// 1. `git status --porcelain` is empty
/// 2. `git cherry -v` is empty (nothing unpushed)
/// 3. after `git fetch origin`, `git log HEAD..origin/<branch>` is empty (nothing unpulled)
pub struct GitGuard<'a> {
    git: Git<'a>,
    skip: bool,
}

impl<'a> GitGuard<'a> {
    pub fn new(git: Git<'a>) -> Self {
        GitGuard { git, skip: false }
    }

    /// Skip every check at once
    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn verify(&self, branch: &str) -> Result<()> {
        if self.skip {
            self.git.logger().info("git", "Skipping Git workspace checks");
            return Ok(());
        }
        self.check_clean()?;
        self.check_pushed()?;
        self.check_pulled(branch)
    }

    pub fn check_clean(&self) -> Result<()> {
        let status = self.git.status_porcelain()?;
        if !status.trim().is_empty() {
            return Err(ReleaseError::WorkspaceDirty(status));
        }
        Ok(())
    }

    pub fn check_pushed(&self) -> Result<()> {
        let unpushed = self.git.unpushed_commits()?;
        if !unpushed.trim().is_empty() {
            return Err(ReleaseError::UnpushedCommits(unpushed));
        }
        Ok(())
    }

    pub fn check_pulled(&self, branch: &str) -> Result<()> {
        self.git.fetch()?;
        let unpulled = self.git.unpulled_commits(branch)?;
        if !unpulled.trim().is_empty() {
            return Err(ReleaseError::UnpulledCommits(unpulled));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{Scripted, ScriptedRunner, Spawner};
    use crate::ui::ReplayLogger;
    use std::path::Path;

    fn verify(runner: &ScriptedRunner, skip: bool) -> Result<()> {
        let logger = ReplayLogger::silent();
        let git = Git::new(Spawner::new(runner, &logger, Path::new(".")));
        GitGuard::new(git).skip(skip).verify("v1.2")
    }

    #[test]
    fn test_all_checks_pass() {
        let runner = ScriptedRunner::new("v1.2");
        verify(&runner, false).unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "git status --porcelain",
                "git cherry -v",
                "git fetch origin",
                "git log HEAD..origin/v1.2 --oneline",
            ]
        );
    }

    #[test]
    fn test_dirty_workspace_stops_before_push_pull_checks() {
        let runner = ScriptedRunner::new("v1.2")
            .on("git status", Scripted::Output(" M index.js\n?? scratch.txt\n".to_string()));

        let err = verify(&runner, false).unwrap_err();
        match &err {
            ReleaseError::WorkspaceDirty(status) => assert!(status.contains("?? scratch.txt")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.calls(), vec!["git status --porcelain"]);
    }

    #[test]
    fn test_unpushed_commits() {
        let runner = ScriptedRunner::new("v1.2")
            .on("git cherry", Scripted::Output("+ 1a2b3c4 local fix\n".to_string()));

        let err = verify(&runner, false).unwrap_err();
        assert!(matches!(err, ReleaseError::UnpushedCommits(ref s) if s.contains("1a2b3c4")));
        assert!(!runner.was_called("git fetch"));
    }

    #[test]
    fn test_unpulled_commits() {
        let runner = ScriptedRunner::new("v1.2")
            .on("git log", Scripted::Output("9f8e7d6 remote change\n".to_string()));

        let err = verify(&runner, false).unwrap_err();
        assert!(matches!(err, ReleaseError::UnpulledCommits(ref s) if s.contains("9f8e7d6")));
    }

    #[test]
    fn test_skip_runs_nothing() {
        let runner = ScriptedRunner::new("v1.2")
            .on("git status", Scripted::Output(" M index.js\n".to_string()));
        verify(&runner, true).unwrap();
        assert!(runner.calls().is_empty());
    }
}
