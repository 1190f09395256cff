//! Lifecycle hooks for extensibility
//!
//! Allows users to run custom scripts at key workflow points:
//! - before-publish: after tests and version resolution, right before `npm publish`

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
