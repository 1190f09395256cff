use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::version::ModuleVersion;

fn short_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^v([0-9]+)\.([0-9]+)$").expect("valid regex"))
}

fn long_form() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^release-([0-9]+)\.([0-9]+)\.x$").expect("valid regex"))
}

/// A release branch dedicated to a single `major.minor` line
///
/// Two naming schemes are recognised: `v1.2` and `release-1.2.x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub major: u64,
    pub minor: u64,
}

impl ReleaseBranch {
    /// Parse a branch name, returning `None` for non-release branches
    pub fn parse(branch: &str) -> Option<Self> {
        let captures = short_form()
            .captures(branch)
            .or_else(|| long_form().captures(branch))?;

        let major = captures.get(1)?.as_str().parse().ok()?;
        let minor = captures.get(2)?.as_str().parse().ok()?;

        Some(ReleaseBranch { major, minor })
    }

    /// The release branch a version belongs to; patch and label are ignored
    pub fn for_version(version: &ModuleVersion) -> Self {
        ReleaseBranch {
            major: version.major,
            minor: version.minor,
        }
    }

    pub fn matches(&self, version: &ModuleVersion) -> bool {
        self.major == version.major && self.minor == version.minor
    }

    /// Short-form branch name (e.g., "v1.4")
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReleaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
