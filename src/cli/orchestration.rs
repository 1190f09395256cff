//! Main workflow orchestration logic
//!
//! Separates CLI argument parsing from the workflows: `main.rs` turns the
//! command line into [WorkflowArgs], this module wires up the production
//! collaborators and dispatches to the selected pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{self, Config};
use crate::pipeline::{
    run_publish, run_release, run_test, PublishArgs, ReleaseArgs, RunResult, Services, TestArgs,
};
use crate::process::{ProcessRunner, SystemProcessRunner};
use crate::project::{ProjectInspector, WorkspaceInspector};
use crate::registry::{HttpRegistryClient, RegistryClient};
use crate::ui::ReplayLogger;

/// The workflow selected on the command line, with its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Publish(PublishArgs),
    Release(ReleaseArgs),
    Test(TestArgs),
}

impl Workflow {
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Publish(_) => "publish",
            Workflow::Release(_) => "release",
            Workflow::Test(_) => "test",
        }
    }
}

/// Arguments for a workflow run
///
/// Mirrors the CLI arguments but in a form that can be built without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowArgs {
    /// Project root containing `package.json`
    pub root: PathBuf,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    pub workflow: Workflow,
}

/// Result of a successful workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub workflow: &'static str,

    /// Summary line of the final step
    pub summary: String,
}

/// Dispatch a workflow with the given collaborators
pub fn execute(workflow: Workflow, root: &Path, services: Services<'_>) -> RunResult {
    log::debug!("running {} in {}", workflow.name(), root.display());
    match workflow {
        Workflow::Publish(args) => run_publish(services, root, args),
        Workflow::Release(args) => run_release(services, root, args),
        Workflow::Test(args) => run_test(services, root, args),
    }
}

/// Run a workflow against the real repository, npm and registry
///
/// Loads the configuration for the project, then executes the workflow with
/// production collaborators. Every line the run records goes to `logger`.
pub fn run_workflow(args: WorkflowArgs, logger: &ReplayLogger) -> Result<WorkflowResult> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", args.root.display()))?;
    let config = config::load_config(&root, args.config_path.as_deref())
        .context("Error loading config")?;

    let inspector = WorkspaceInspector::new(config.clone());
    let runner = SystemProcessRunner;
    let registry = HttpRegistryClient::new();

    run_with(args.workflow, &root, &config, &inspector, &runner, &registry, logger)
}

/// Run a workflow with explicit collaborators, converting the outcome for the CLI
pub fn run_with(
    workflow: Workflow,
    root: &Path,
    config: &Config,
    inspector: &dyn ProjectInspector,
    runner: &dyn ProcessRunner,
    registry: &dyn RegistryClient,
    logger: &ReplayLogger,
) -> Result<WorkflowResult> {
    let services = Services {
        config,
        inspector,
        runner,
        registry,
        logger,
    };

    match execute(workflow, root, services) {
        RunResult::Succeeded { summary, .. } => Ok(WorkflowResult {
            workflow: workflow.name(),
            summary,
        }),
        RunResult::Failed { step, error } => {
            Err(error).with_context(|| format!("{} failed at step '{}'", workflow.name(), step))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_names() {
        assert_eq!(Workflow::Publish(PublishArgs::default()).name(), "publish");
        assert_eq!(Workflow::Release(ReleaseArgs::default()).name(), "release");
        assert_eq!(Workflow::Test(TestArgs { clean: true }).name(), "test");
    }

    #[test]
    fn test_missing_root_is_reported() {
        let args = WorkflowArgs {
            root: PathBuf::from("/nonexistent/module-release/project"),
            config_path: None,
            workflow: Workflow::Test(TestArgs::default()),
        };
        let logger = ReplayLogger::silent();

        let err = run_workflow(args, &logger).unwrap_err();
        assert!(err.to_string().contains("Project directory not found"));
    }
}
