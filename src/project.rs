//! Project state snapshot: manifest, branch and registry settings

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::git::repository;
use crate::manifest::PackageManifest;

/// Directory holding installed dependencies
pub const INSTALLED_DEPENDENCIES_DIR: &str = "node_modules";

/// Immutable view of the project's surroundings at inspection time
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub root: PathBuf,
    /// Current branch; `None` on a detached HEAD
    pub branch: Option<String>,
    pub registry_read: String,
    pub registry_write: String,
    pub registry_public: String,
    pub user_config: PathBuf,
}

impl ProjectInfo {
    pub fn installed_dependencies_dir(&self) -> PathBuf {
        self.root.join(INSTALLED_DEPENDENCIES_DIR)
    }
}

/// Everything a pipeline run knows about the project
///
/// Replaced wholesale whenever the working branch changes.
#[derive(Debug, Clone)]
pub struct Project {
    pub info: ProjectInfo,
    pub manifest: PackageManifest,
}

impl Project {
    /// Build a snapshot from an already-known branch
    pub fn assemble(root: &Path, branch: Option<String>, config: &Config) -> Result<Self> {
        let manifest = PackageManifest::load_dir(root)?;
        let info = ProjectInfo {
            root: root.to_path_buf(),
            branch,
            registry_read: config.registry.read.clone(),
            registry_write: config.registry.write.clone(),
            registry_public: config.registry.public.clone(),
            user_config: config.user_config_path(root),
        };
        Ok(Project { info, manifest })
    }
}

/// Reads project state from a root directory
pub trait ProjectInspector: Send + Sync {
    fn inspect(&self, root: &Path) -> Result<Project>;
}

/// Inspector backed by the file system and the git repository containing the project
pub struct WorkspaceInspector {
    config: Config,
}

impl WorkspaceInspector {
    pub fn new(config: Config) -> Self {
        WorkspaceInspector { config }
    }
}

impl ProjectInspector for WorkspaceInspector {
    fn inspect(&self, root: &Path) -> Result<Project> {
        let branch = repository::current_branch(root)?;
        log::debug!(
            "inspected {}: branch {}",
            root.display(),
            branch.as_deref().unwrap_or("(detached)")
        );
        Project::assemble(root, branch, &self.config)
    }
}
