//! `package.json` reading and version persistence

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ModuleVersion;
use crate::error::{ReleaseError, Result};

pub const MANIFEST_FILE: &str = "package.json";

/// Which dependency map of a manifest a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 2] = [
        DependencyKind::Dependencies,
        DependencyKind::DevDependencies,
    ];

    /// Key of the dependency map in `package.json`
    pub fn key(&self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A module manifest loaded from disk
///
/// The whole JSON document is retained so that [`PackageManifest::write`]
/// only rewrites the `version` field and leaves every other key in place.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    pub path: PathBuf,
    pub name: String,
    /// Version string as found in the file
    pub declared_version: String,
    /// Parsed version; `None` when the declared version is not valid semver
    pub version: Option<ModuleVersion>,
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    document: Value,
}

impl PackageManifest {
    /// Load the manifest in `dir`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(MANIFEST_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ReleaseError::manifest(path, format!("cannot read: {}", e)))?;
        Self::parse(path, &text)
    }

    /// Parse manifest text; `path` is only recorded for messages and writes
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(path, format!("invalid JSON: {}", e)))?;

        let object = document
            .as_object()
            .ok_or_else(|| ReleaseError::manifest(path, "top-level value is not an object"))?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let declared_version = object
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let version = ModuleVersion::parse(&declared_version).ok();

        Ok(PackageManifest {
            path: path.to_path_buf(),
            name,
            declared_version,
            version,
            dependencies: dependency_map(object, DependencyKind::Dependencies),
            dev_dependencies: dependency_map(object, DependencyKind::DevDependencies),
            document,
        })
    }

    pub fn dependencies_of(&self, kind: DependencyKind) -> &BTreeMap<String, String> {
        match kind {
            DependencyKind::Dependencies => &self.dependencies,
            DependencyKind::DevDependencies => &self.dev_dependencies,
        }
    }

    /// The parsed version, or a policy error when it could not be parsed
    pub fn parsed_version(&self) -> Result<&ModuleVersion> {
        self.version.as_ref().ok_or_else(|| {
            ReleaseError::policy(format!(
                "Unable to parse version in package.json: {}",
                self.declared_version
            ))
        })
    }

    pub fn parsed_version_mut(&mut self) -> Result<&mut ModuleVersion> {
        let declared = &self.declared_version;
        self.version.as_mut().ok_or_else(|| {
            ReleaseError::policy(format!(
                "Unable to parse version in package.json: {}",
                declared
            ))
        })
    }

    /// Current version string, reflecting any in-memory bump
    pub fn version_string(&self) -> String {
        match &self.version {
            Some(version) => version.to_string(),
            None => self.declared_version.clone(),
        }
    }

    /// Persist the current version to disk
    pub fn write(&mut self) -> Result<()> {
        let version = self.version_string();
        if let Some(object) = self.document.as_object_mut() {
            object.insert("version".to_string(), Value::String(version.clone()));
        }

        let mut text = serde_json::to_string_pretty(&self.document)?;
        text.push('\n');
        fs::write(&self.path, text)?;

        self.declared_version = version;
        log::debug!("wrote {} with version {}", self.path.display(), self.declared_version);
        Ok(())
    }
}

fn dependency_map(object: &Map<String, Value>, kind: DependencyKind) -> BTreeMap<String, String> {
    object
        .get(kind.key())
        .and_then(Value::as_object)
        .map(|deps| {
            deps.iter()
                .filter_map(|(name, range)| range.as_str().map(|r| (name.clone(), r.to_string())))
                .collect()
        })
        .unwrap_or_default()
}
