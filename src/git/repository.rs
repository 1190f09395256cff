use git2::{ErrorCode, Repository};
use std::path::Path;

use crate::error::Result;

/// Name of the branch checked out in the repository containing `path`
///
/// Returns `None` on a detached HEAD. A freshly initialised repository with
/// no commits still reports the branch HEAD points to.
pub fn current_branch(path: &Path) -> Result<Option<String>> {
    let repo = Repository::discover(path)?;

    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD")?;
            return Ok(head
                .symbolic_target()
                .and_then(|target| target.strip_prefix("refs/heads/"))
                .map(str::to_string));
        }
        Err(e) => return Err(e.into()),
    };

    if !head.is_branch() {
        return Ok(None);
    }

    Ok(head.shorthand().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{RepositoryInitOptions, Signature};

    fn init(dir: &Path, branch: &str) -> Repository {
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head(branch);
        Repository::init_opts(dir, &opts).unwrap()
    }

    #[test]
    fn test_unborn_branch() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), "trunk");
        assert_eq!(current_branch(dir.path()).unwrap().as_deref(), Some("trunk"));
    }

    #[test]
    fn test_branch_after_commit_and_detach() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path(), "v1.2");

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit = repo
            .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();

        assert_eq!(current_branch(dir.path()).unwrap().as_deref(), Some("v1.2"));

        repo.set_head_detached(commit).unwrap();
        assert_eq!(current_branch(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_discovers_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        init(dir.path(), "master");
        let nested = dir.path().join("packages/widget");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(current_branch(&nested).unwrap().as_deref(), Some("master"));
    }

    #[test]
    fn test_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        // tempdir may live under a repository on some machines; only assert when it does not
        if Repository::discover(dir.path()).is_err() {
            assert!(current_branch(dir.path()).is_err());
        }
    }
}
