//! Collaborators shared by every workflow and the steps they have in common

use std::fs;
use std::path::Path;

use crate::analyzer::PrereleaseScanner;
use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::git::{Git, GitGuard};
use crate::npm::Npm;
use crate::process::{ProcessRunner, Spawner};
use crate::project::{Project, ProjectInfo, ProjectInspector};
use crate::registry::RegistryClient;
use crate::ui::ReplayLogger;

/// Everything a run needs from the outside world
///
/// Nested runs (the publish inside a release) receive the same services, so
/// they share one logger and one process runner.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub config: &'a Config,
    pub inspector: &'a dyn ProjectInspector,
    pub runner: &'a dyn ProcessRunner,
    pub registry: &'a dyn RegistryClient,
    pub logger: &'a ReplayLogger,
}

impl<'a> Services<'a> {
    pub fn spawner<'r>(&self, cwd: &'r Path) -> Spawner<'r>
    where
        'a: 'r,
    {
        Spawner::new(self.runner, self.logger, cwd)
    }

    pub fn git<'r>(&self, root: &'r Path) -> Git<'r>
    where
        'a: 'r,
    {
        Git::new(self.spawner(root))
    }

    pub fn npm<'r>(&self, root: &'r Path) -> Npm<'r>
    where
        'a: 'r,
    {
        Npm::new(self.spawner(root))
    }

    pub fn scanner(&self) -> PrereleaseScanner {
        PrereleaseScanner::new(&self.config.prerelease.markers)
    }

    /// Fresh snapshot of the project at `root`
    pub fn inspect(&self, root: &Path) -> Result<Project> {
        self.inspector.inspect(root)
    }
}

/// Current branch of a snapshot; publishing from a detached HEAD is refused
pub fn current_branch(project: &Project) -> Result<&str> {
    project.info.branch.as_deref().ok_or_else(|| {
        ReleaseError::policy(format!(
            "Unable to determine the current branch of {} (detached HEAD?)",
            project.info.root.display()
        ))
    })
}

/// Fail when the module or, with `recursive`, anything installed below it
/// depends on a pre-release
pub fn check_dependencies(
    services: &Services<'_>,
    project: &Project,
    recursive: bool,
) -> Result<()> {
    let scope = if recursive {
        "installed dependency tree"
    } else {
        "module dependencies"
    };
    services.logger.info("deps", format!("Checking {} for pre-release versions", scope));

    let violations = services.scanner().scan(&project.manifest, recursive)?;
    if violations.is_empty() {
        return Ok(());
    }

    Err(ReleaseError::DependencyPolicy(
        violations
            .iter()
            .map(|v| v.describe(&project.info.root))
            .collect(),
    ))
}

/// Run the clean / pushed / pulled checks against the snapshot's branch
pub fn verify_workspace(services: &Services<'_>, project: &Project, skip: bool) -> Result<()> {
    let branch = current_branch(project)?;
    GitGuard::new(services.git(&project.info.root))
        .skip(skip)
        .verify(branch)
}

/// Delete the installed-dependency tree, if any
pub fn remove_installed_dependencies(services: &Services<'_>, info: &ProjectInfo) -> Result<()> {
    let dir = info.installed_dependencies_dir();
    if dir.exists() {
        services.logger.info("delete", dir.display().to_string());
        fs::remove_dir_all(&dir)?;
    }
    Ok(())
}

/// Commit message of every automated version change
pub fn version_commit_message(version: &str) -> String {
    format!("Updated version to {}", version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ScriptedRunner;
    use std::path::PathBuf;

    struct NeverPublished;

    impl RegistryClient for NeverPublished {
        fn version_exists(&self, _: &str, _: &str, _: &str) -> Result<bool> {
            Ok(false)
        }
    }

    struct FixedInspector(Project);

    impl ProjectInspector for FixedInspector {
        fn inspect(&self, _: &Path) -> Result<Project> {
            Ok(self.0.clone())
        }
    }

    fn project(dir: &Path, manifest: &str, branch: Option<&str>) -> Project {
        fs::write(dir.join("package.json"), manifest).unwrap();
        Project::assemble(dir, branch.map(String::from), &Config::default()).unwrap()
    }

    #[test]
    fn test_version_commit_message() {
        assert_eq!(version_commit_message("2.0.1"), "Updated version to 2.0.1");
    }

    #[test]
    fn test_current_branch_requires_attached_head() {
        let dir = tempfile::tempdir().unwrap();
        let detached = project(dir.path(), r#"{"name":"widget","version":"1.0.0"}"#, None);
        let err = current_branch(&detached).unwrap_err();
        assert!(matches!(err, ReleaseError::ManifestPolicy(_)));
    }

    #[test]
    fn test_check_dependencies_lists_every_offender() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(
            dir.path(),
            r#"{
                "name": "widget",
                "version": "1.0.0",
                "dependencies": {"a": "1.0.0-beta", "b": "^2.0.0"},
                "devDependencies": {"c": "3.0.0-SNAPSHOT"}
            }"#,
            Some("v1.0"),
        );

        let config = Config::default();
        let runner = ScriptedRunner::new("v1.0");
        let logger = ReplayLogger::silent();
        let inspector = FixedInspector(project.clone());
        let services = Services {
            config: &config,
            inspector: &inspector,
            runner: &runner,
            registry: &NeverPublished,
            logger: &logger,
        };

        match check_dependencies(&services, &project, false).unwrap_err() {
            ReleaseError::DependencyPolicy(offenders) => {
                assert_eq!(
                    offenders,
                    vec![
                        "a@1.0.0-beta in package.json (dependencies)".to_string(),
                        "c@3.0.0-SNAPSHOT in package.json (devDependencies)".to_string(),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remove_installed_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path(), r#"{"name":"widget","version":"1.0.0"}"#, Some("v1.0"));
        let installed: PathBuf = project.info.installed_dependencies_dir();
        fs::create_dir_all(installed.join("left-pad")).unwrap();

        let config = Config::default();
        let runner = ScriptedRunner::new("v1.0");
        let logger = ReplayLogger::silent();
        let inspector = FixedInspector(project.clone());
        let services = Services {
            config: &config,
            inspector: &inspector,
            runner: &runner,
            registry: &NeverPublished,
            logger: &logger,
        };

        remove_installed_dependencies(&services, &project.info).unwrap();
        assert!(!installed.exists());
        assert_eq!(logger.entries()[0].category, "delete");

        // Nothing to delete the second time
        remove_installed_dependencies(&services, &project.info).unwrap();
        assert_eq!(logger.entries().len(), 1);
    }
}
