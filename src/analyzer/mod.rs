//! Dependency analysis

pub mod prerelease;

pub use prerelease::{DependencyViolation, PrereleaseScanner};
