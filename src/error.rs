use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for module-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Manifest policy violation: {0}")]
    ManifestPolicy(String),

    #[error(
        "npm user config does not exist at path \"{}\". This file should contain the configuration for an authenticated npm user session.",
        .0.display()
    )]
    CredentialsMissing(PathBuf),

    #[error(
        "Unable to publish module since it depends on pre-release versions:\n- {}\n\npackage.json should be modified as to not depend on any pre-release versions.",
        .0.join("\n- ")
    )]
    DependencyPolicy(Vec<String>),

    #[error("A module cannot be published unless the Git workspace is clean. Actual Git status:\n{0}")]
    WorkspaceDirty(String),

    #[error("A module cannot be published unless all commits have been pushed to the upstream repository.\nThe following commits have not been pushed:\n{0}")]
    UnpushedCommits(String),

    #[error("A module cannot be published unless all commits have been pulled from the upstream repository.\nThe following commits have not been pulled:\n{0}")]
    UnpulledCommits(String),

    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    ExternalProcess {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Registry lookup failed: {0}")]
    Registry(String),

    #[error("Invalid manifest {}: {message}", .path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in module-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    pub fn policy(msg: impl Into<String>) -> Self {
        ReleaseError::ManifestPolicy(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    pub fn registry(msg: impl Into<String>) -> Self {
        ReleaseError::Registry(msg.into())
    }

    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseError::Hook(msg.into())
    }

    pub fn manifest(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        ReleaseError::Manifest {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Short machine-friendly name of the error kind, used in the run summary
    pub fn kind(&self) -> &'static str {
        match self {
            ReleaseError::ManifestPolicy(_) => "manifest-policy",
            ReleaseError::CredentialsMissing(_) => "credentials-missing",
            ReleaseError::DependencyPolicy(_) => "dependency-policy",
            ReleaseError::WorkspaceDirty(_) => "workspace-dirty",
            ReleaseError::UnpushedCommits(_) => "unpushed-commits",
            ReleaseError::UnpulledCommits(_) => "unpulled-commits",
            ReleaseError::ExternalProcess { .. } => "external-process",
            ReleaseError::Registry(_) => "registry",
            ReleaseError::Manifest { .. } => "manifest",
            ReleaseError::Config(_) => "config",
            ReleaseError::Version(_) => "version",
            ReleaseError::Hook(_) => "hook",
            ReleaseError::Git(_) => "git",
            ReleaseError::Io(_) => "io",
            ReleaseError::Json(_) => "json",
        }
    }
}
