use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::manifest::{DependencyKind, PackageManifest, MANIFEST_FILE};
use crate::project::INSTALLED_DEPENDENCIES_DIR;

/// A dependency declared with a pre-release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyViolation {
    pub module_name: String,
    pub version: String,
    pub declaring_file: PathBuf,
    pub kind: DependencyKind,
}

impl DependencyViolation {
    /// One-line description with the declaring file shown relative to `root`
    pub fn describe(&self, root: &Path) -> String {
        let file = self
            .declaring_file
            .strip_prefix(root)
            .unwrap_or(&self.declaring_file);
        format!(
            "{}@{} in {} ({})",
            self.module_name,
            self.version,
            file.display(),
            self.kind
        )
    }
}

impl fmt::Display for DependencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} in {} ({})",
            self.module_name,
            self.version,
            self.declaring_file.display(),
            self.kind
        )
    }
}

/// Finds dependencies declared with pre-release versions
///
/// A declared version is pre-release when it contains one of the configured
/// markers, compared case-insensitively.
pub struct PrereleaseScanner {
    markers: Vec<String>,
}

impl PrereleaseScanner {
    pub fn new(markers: &[String]) -> Self {
        PrereleaseScanner {
            markers: markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    pub fn is_prerelease(&self, declared: &str) -> bool {
        let declared = declared.to_lowercase();
        self.markers.iter().any(|marker| declared.contains(marker.as_str()))
    }

    /// Collect every pre-release dependency of `manifest`
    ///
    /// A module that is itself a pre-release may depend on anything, so the
    /// result is empty when the manifest's version has a label. With
    /// `recursive`, every package installed below the module (at any depth) is
    /// checked as well. Nothing short-circuits: all offenders are returned.
    pub fn scan(
        &self,
        manifest: &PackageManifest,
        recursive: bool,
    ) -> Result<Vec<DependencyViolation>> {
        if manifest.version.as_ref().is_some_and(|v| v.is_prerelease()) {
            return Ok(Vec::new());
        }

        let mut violations = self.check_manifest(manifest);

        if recursive {
            let root = manifest
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            self.scan_installed(&root, &mut violations)?;
        }

        Ok(violations)
    }

    fn check_manifest(&self, manifest: &PackageManifest) -> Vec<DependencyViolation> {
        let mut violations = Vec::new();
        for kind in DependencyKind::ALL {
            for (name, version) in manifest.dependencies_of(kind) {
                if self.is_prerelease(version) {
                    violations.push(DependencyViolation {
                        module_name: name.clone(),
                        version: version.clone(),
                        declaring_file: manifest.path.clone(),
                        kind,
                    });
                }
            }
        }
        violations
    }

    /// Walk the installed-dependency tree below `root` with an explicit worklist
    fn scan_installed(&self, root: &Path, violations: &mut Vec<DependencyViolation>) -> Result<()> {
        let mut visited: HashSet<PathBuf> = HashSet::new();
        visited.insert(canonical(root));

        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let installed = dir.join(INSTALLED_DEPENDENCIES_DIR);
            if !installed.is_dir() {
                continue;
            }

            for package_dir in package_dirs(&installed)? {
                if !visited.insert(canonical(&package_dir)) {
                    log::debug!("already visited {}", package_dir.display());
                    continue;
                }

                let package = PackageManifest::load(&package_dir.join(MANIFEST_FILE))?;
                violations.extend(self.check_manifest(&package));
                pending.push(package_dir);
            }
        }
        Ok(())
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Package directories directly inside an installed-dependency directory
///
/// Scoped packages live one level deeper (`@scope/name`). Directories without
/// a manifest (such as `.bin`) are not packages.
fn package_dirs(installed: &Path) -> Result<Vec<PathBuf>> {
    let mut packages = Vec::new();
    for entry in sorted_subdirs(installed)? {
        if entry.join(MANIFEST_FILE).is_file() {
            packages.push(entry);
        } else if is_scope(&entry) {
            packages.extend(
                sorted_subdirs(&entry)?
                    .into_iter()
                    .filter(|p| p.join(MANIFEST_FILE).is_file()),
            );
        }
    }
    Ok(packages)
}

fn is_scope(dir: &Path) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('@'))
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    fn markers() -> Vec<String> {
        vec!["-beta".to_string(), "-snapshot".to_string()]
    }

    fn write_package(dir: &Path, json: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn test_marker_matching_is_case_insensitive() {
        let scanner = PrereleaseScanner::new(&markers());
        assert!(scanner.is_prerelease("^1.0.0-beta"));
        assert!(scanner.is_prerelease("2.0.0-SNAPSHOT"));
        assert!(scanner.is_prerelease("~3.1.0-Beta.2"));
        assert!(!scanner.is_prerelease("^1.0.0"));
        assert!(!scanner.is_prerelease("1.0.0-rc.1"));
    }

    #[test]
    fn test_labelled_module_is_not_checked() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"name":"app","version":"1.0.0-beta","dependencies":{"lib":"1.0.0-beta"}}"#,
        );
        let manifest = PackageManifest::load_dir(dir.path()).unwrap();
        let scanner = PrereleaseScanner::new(&markers());
        assert!(scanner.scan(&manifest, true).unwrap().is_empty());
    }

    #[test]
    fn test_both_dependency_maps() {
        let dir = tempfile::tempdir().unwrap();
        write_package(
            dir.path(),
            r#"{"name":"app","version":"1.0.0",
                "dependencies":{"a":"1.0.0-beta","b":"^2.0.0"},
                "devDependencies":{"c":"3.0.0-SNAPSHOT"}}"#,
        );
        let manifest = PackageManifest::load_dir(dir.path()).unwrap();
        let violations = PrereleaseScanner::new(&markers()).scan(&manifest, false).unwrap();

        let described: Vec<String> = violations.iter().map(|v| v.describe(dir.path())).collect();
        assert_eq!(
            described,
            vec![
                "a@1.0.0-beta in package.json (dependencies)",
                "c@3.0.0-SNAPSHOT in package.json (devDependencies)",
            ]
        );
    }

    #[test]
    fn test_recursive_counts_every_offending_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_package(root, r#"{"name":"app","version":"1.0.0","dependencies":{"a":"^1.0.0"}}"#);
        write_package(
            &root.join("node_modules/a"),
            r#"{"name":"a","version":"1.0.0","dependencies":{"b":"1.0.0-beta"}}"#,
        );
        write_package(
            &root.join("node_modules/a/node_modules/b"),
            r#"{"name":"b","version":"1.0.0-beta","devDependencies":{"c":"0.1.0-snapshot"}}"#,
        );
        write_package(
            &root.join("node_modules/@scope/d"),
            r#"{"name":"@scope/d","version":"1.0.0","dependencies":{"e":"2.0.0-beta"}}"#,
        );
        write_package(&root.join("node_modules/clean"), r#"{"name":"clean","version":"1.0.0"}"#);
        fs::create_dir_all(root.join("node_modules/.bin")).unwrap();

        let manifest = PackageManifest::load_dir(root).unwrap();
        let scanner = PrereleaseScanner::new(&markers());

        assert!(scanner.scan(&manifest, false).unwrap().is_empty());

        let mut names: Vec<String> = scanner
            .scan(&manifest, true)
            .unwrap()
            .into_iter()
            .map(|v| v.module_name)
            .collect();
        names.sort();
        // installed packages are checked regardless of their own label
        assert_eq!(names, vec!["b", "c", "e"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_package(root, r#"{"name":"app","version":"1.0.0"}"#);
        write_package(
            &root.join("node_modules/a"),
            r#"{"name":"a","version":"1.0.0","dependencies":{"x":"1.0.0-beta"}}"#,
        );
        fs::create_dir_all(root.join("node_modules/a/node_modules")).unwrap();
        std::os::unix::fs::symlink(
            root.join("node_modules/a"),
            root.join("node_modules/a/node_modules/a"),
        )
        .unwrap();
        std::os::unix::fs::symlink(root, root.join("node_modules/app")).unwrap();

        let manifest = PackageManifest::load_dir(root).unwrap();
        let violations = PrereleaseScanner::new(&markers()).scan(&manifest, true).unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_malformed_installed_manifest_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_package(root, r#"{"name":"app","version":"1.0.0"}"#);
        write_package(&root.join("node_modules/bad"), "{ not json");

        let manifest = PackageManifest::load_dir(root).unwrap();
        let err = PrereleaseScanner::new(&markers()).scan(&manifest, true).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Manifest { ref path, .. } if path.ends_with("bad/package.json")
        ));
    }
}
