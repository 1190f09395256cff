use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Project-level configuration file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "release.toml";

/// User-level configuration file name, looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".module-release.toml";

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Represents the complete configuration for module-release.
///
/// Contains the trunk branch name, registry endpoints, pre-release detection
/// settings and optional lifecycle scripts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,

    #[serde(default)]
    pub scripts: ScriptsConfig,
}

fn default_trunk_branch() -> String {
    "master".to_string()
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

/// Registry endpoints and the npm user config holding credentials.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_registry")]
    pub read: String,

    #[serde(default = "default_registry")]
    pub write: String,

    /// Registry used instead of `write` when publishing with `--public`
    #[serde(default = "default_registry")]
    pub public: String,

    /// npm user config file; defaults to `~/.npmrc`
    #[serde(default)]
    pub user_config: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            read: default_registry(),
            write: default_registry(),
            public: default_registry(),
            user_config: None,
        }
    }
}

/// Returns the default dependency version markers that flag a pre-release.
fn default_markers() -> Vec<String> {
    vec!["-beta".to_string(), "-snapshot".to_string()]
}

fn default_next_label() -> String {
    "beta".to_string()
}

/// Pre-release detection and labelling.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrereleaseConfig {
    /// Substrings that mark a declared dependency version as pre-release (case-insensitive)
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,

    /// Label put on the trunk version after a release (e.g. "beta" in `1.5.0-beta`)
    #[serde(default = "default_next_label")]
    pub next_label: String,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        PrereleaseConfig {
            markers: default_markers(),
            next_label: default_next_label(),
        }
    }
}

/// Lifecycle scripts run during publish.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ScriptsConfig {
    #[serde(default)]
    pub before_publish: Option<String>,

    /// Working directory for `before_publish`, relative to the project root
    #[serde(default)]
    pub before_publish_cwd: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trunk_branch: default_trunk_branch(),
            registry: RegistryConfig::default(),
            prerelease: PrereleaseConfig::default(),
            scripts: ScriptsConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the npm user config path; relative paths are taken from the project root
    pub fn user_config_path(&self, root: &Path) -> PathBuf {
        match &self.registry.user_config {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => dirs::home_dir()
                .unwrap_or_else(|| root.to_path_buf())
                .join(".npmrc"),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the project root
/// 3. `.module-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let candidate = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if root.join(PROJECT_CONFIG_FILE).exists() {
        Some(root.join(PROJECT_CONFIG_FILE))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(USER_CONFIG_FILE))
            .filter(|path| path.exists())
    };

    let Some(path) = candidate else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("Cannot parse {}: {}", path.display(), e)))
}
