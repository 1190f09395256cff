// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use module_release::config::Config;
use module_release::error::{ReleaseError, Result};
use module_release::pipeline::Services;
use module_release::process::ScriptedRunner;
use module_release::project::{Project, ProjectInspector};
use module_release::registry::RegistryClient;
use module_release::ui::ReplayLogger;
use tempfile::TempDir;

/// Inspector that reports whatever branch the scripted runner has checked out
pub struct BranchTracking<'a> {
    pub runner: &'a ScriptedRunner,
    pub config: Config,
}

impl ProjectInspector for BranchTracking<'_> {
    fn inspect(&self, root: &Path) -> Result<Project> {
        Project::assemble(root, Some(self.runner.branch()), &self.config)
    }
}

/// Registry holding a fixed set of published `name@version` entries
#[derive(Default)]
pub struct MemoryRegistry {
    published: Mutex<HashSet<String>>,
    queries: Mutex<Vec<String>>,
    unreachable: bool,
}

impl MemoryRegistry {
    pub fn with(published: &[&str]) -> Self {
        MemoryRegistry {
            published: Mutex::new(published.iter().map(|p| p.to_string()).collect()),
            ..Default::default()
        }
    }

    /// Registry whose every lookup fails
    pub fn unreachable() -> Self {
        MemoryRegistry {
            unreachable: true,
            ..Default::default()
        }
    }

    /// `name@version` of every lookup, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl RegistryClient for MemoryRegistry {
    fn version_exists(&self, registry: &str, module: &str, version: &str) -> Result<bool> {
        let key = format!("{}@{}", module, version);
        self.queries.lock().unwrap().push(key.clone());
        if self.unreachable {
            return Err(ReleaseError::registry(format!("{}: connection refused", registry)));
        }
        Ok(self.published.lock().unwrap().contains(&key))
    }
}

/// A module checked out in a temporary directory, with npm credentials
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new(name: &str, version: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".npmrc"), "//registry.npmjs.org/:_authToken=secret\n").unwrap();

        let mut config = Config::default();
        config.registry.user_config = Some(PathBuf::from(".npmrc"));

        let fixture = Fixture { dir, config };
        fixture.write_manifest(&format!(
            r#"{{
  "name": "{}",
  "version": "{}",
  "dependencies": {{
    "left-pad": "^1.3.0"
  }}
}}
"#,
            name, version
        ));
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_manifest(&self, text: &str) {
        fs::write(self.root().join("package.json"), text).unwrap();
    }

    /// Declared version currently on disk
    pub fn version_on_disk(&self) -> String {
        let text = fs::read_to_string(self.root().join("package.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        value["version"].as_str().unwrap().to_string()
    }

    /// Install a package below `parent` (relative to the root)
    pub fn install(&self, parent: &str, name: &str, manifest: &str) -> PathBuf {
        let dir = self.root().join(parent).join("node_modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), manifest).unwrap();
        dir
    }
}

/// Bundle the collaborators of a run
pub fn services<'a>(
    config: &'a Config,
    inspector: &'a BranchTracking<'a>,
    runner: &'a ScriptedRunner,
    registry: &'a MemoryRegistry,
    logger: &'a ReplayLogger,
) -> Services<'a> {
    Services {
        config,
        inspector,
        runner,
        registry,
        logger,
    }
}

/// Commands that change remote state
pub fn remote_effects(runner: &ScriptedRunner) -> Vec<String> {
    runner
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("git push") || c.starts_with("git tag") || c.starts_with("npm publish"))
        .collect()
}
