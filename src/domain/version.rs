use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version of a module as declared in its manifest
///
/// `label` is the pre-release part ("beta" in `1.3.0-beta`) and `build` the
/// build metadata ("sha.5114f85" in `1.0.0+sha.5114f85`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub label: Option<String>,
    pub build: Option<String>,
}

impl ModuleVersion {
    /// Create a release version without label or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ModuleVersion {
            major,
            minor,
            patch,
            label: None,
            build: None,
        }
    }

    /// Parse a semantic version string (e.g., "1.2.3-beta+build.1")
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text.trim())
            .map_err(|e| ReleaseError::version(format!("Invalid version '{}': {}", text, e)))?;

        Ok(ModuleVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            label: non_empty(parsed.pre.as_str()),
            build: non_empty(parsed.build.as_str()),
        })
    }

    /// Whether the version carries a pre-release label
    pub fn is_prerelease(&self) -> bool {
        self.label.is_some()
    }

    pub fn inc_patch(&mut self) {
        self.patch += 1;
    }

    pub fn inc_minor(&mut self) {
        self.minor += 1;
        self.patch = 0;
    }

    /// Drop the pre-release label and build metadata, turning `1.4.0-beta` into `1.4.0`
    pub fn strip_label(&mut self) {
        self.label = None;
        self.build = None;
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.label = non_empty(&label);
    }

    /// Repository tag name for this version (e.g., "v1.2.3")
    pub fn tag_name(&self) -> String {
        format!("v{}", self)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl FromStr for ModuleVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        ModuleVersion::parse(s)
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(label) = &self.label {
            write!(f, "-{}", label)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
