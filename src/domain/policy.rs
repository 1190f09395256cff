//! Version/branch policy rules
//!
//! Pure checks over the current branch, the manifest version and the
//! registry credentials location. Nothing here touches git or the registry.

use std::path::Path;

use super::branch::ReleaseBranch;
use super::version::ModuleVersion;
use crate::error::{ReleaseError, Result};

/// Check that a branch/version pair may be published
///
/// On a release branch (`v1.2`, `release-1.2.x`) the branch's major/minor must
/// equal the version's. Any other branch requires a pre-release label.
pub fn validate_branch_version(branch: &str, version: &ModuleVersion) -> Result<()> {
    match ReleaseBranch::parse(branch) {
        Some(release) => {
            if !release.matches(version) {
                return Err(ReleaseError::policy(format!(
                    "Release branch version does not match version in package.json. Branch: {} ({}.{}), Module version: {}",
                    branch, release.major, release.minor, version
                )));
            }
        }
        None => {
            if !version.is_prerelease() {
                return Err(ReleaseError::policy(format!(
                    "pre-release label (e.g. \"-beta\") is required in version on non-release branches. Branch: {}, Actual version: {}",
                    branch, version
                )));
            }
        }
    }
    Ok(())
}

/// Check that a release may be cut from this branch
///
/// Releases start from the trunk branch, which always tracks the next
/// unreleased pre-release.
pub fn validate_release_origin(branch: &str, trunk: &str, version: &ModuleVersion) -> Result<()> {
    if branch != trunk {
        return Err(ReleaseError::policy(format!(
            "A module can only be released from {} (current branch: {})",
            trunk, branch
        )));
    }

    if !version.is_prerelease() {
        return Err(ReleaseError::policy(format!(
            "Version should include pre-release label on {} (e.g. \"-beta\"). Actual version: {}",
            trunk, version
        )));
    }

    Ok(())
}

/// The registry credentials file must exist before anything is published
pub fn ensure_credentials(user_config: &Path) -> Result<()> {
    if !user_config.is_file() {
        return Err(ReleaseError::CredentialsMissing(user_config.to_path_buf()));
    }
    Ok(())
}
