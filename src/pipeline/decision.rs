//! Whether there is anything to publish, and under which version

use std::thread;

use crate::error::Result;
use crate::git::Git;
use crate::manifest::PackageManifest;
use crate::registry::RegistryClient;
use crate::ui::ReplayLogger;

/// Compare the working position with the commit `tag` points to
///
/// Returns `false` only when the tag exists and points at HEAD. A missing tag
/// means the version was never published from this repository. Both lookups
/// are independent and run side by side.
pub fn has_changes_since(git: Git<'_>, tag: &str) -> Result<bool> {
    let (head, tagged) = thread::scope(|scope| {
        let head = scope.spawn(|| git.head_commit());
        let tagged = scope.spawn(|| git.tag_commit(tag));
        (join(head), join(tagged))
    });

    match tagged? {
        Some(tagged) => Ok(head? != tagged),
        None => {
            head?;
            Ok(true)
        }
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Ask the registry whether `module@version` exists
///
/// A lookup that fails for any reason other than a definitive "not found"
/// still counts as not published, but the failure is logged.
pub fn is_published(
    registry: &dyn RegistryClient,
    registry_url: &str,
    module: &str,
    version: &str,
    logger: &ReplayLogger,
) -> bool {
    match registry.version_exists(registry_url, module, version) {
        Ok(exists) => exists,
        Err(err) => {
            logger.error(
                "registry",
                format!(
                    "Could not tell whether {}@{} is published, assuming it is not: {}",
                    module, version, err
                ),
            );
            false
        }
    }
}

/// Increment the patch component and persist the manifest
///
/// Returns the new version string; major, minor and label stay as they are.
pub fn bump_patch(manifest: &mut PackageManifest) -> Result<String> {
    manifest.parsed_version_mut()?.inc_patch();
    manifest.write()?;
    Ok(manifest.version_string())
}
