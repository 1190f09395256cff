//! Domain logic - pure business rules independent of git, npm and the registry

pub mod branch;
pub mod policy;
pub mod version;

pub use branch::ReleaseBranch;
pub use policy::{ensure_credentials, validate_branch_version, validate_release_origin};
pub use version::ModuleVersion;
