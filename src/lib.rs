pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod manifest;
pub mod npm;
pub mod pipeline;
pub mod process;
pub mod project;
pub mod registry;
pub mod ui;

pub use error::{ReleaseError, Result};
