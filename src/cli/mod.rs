//! Command-line workflow dispatch

pub mod orchestration;

pub use orchestration::{run_workflow, Workflow, WorkflowArgs, WorkflowResult};
