//! Ordered, fail-fast step execution
//!
//! A workflow is a [Pipeline] of [Step]s over a context type `C` that owns the
//! run's state. Steps run strictly in order:
//!
//! - a step whose guard returns `false` is skipped
//! - a step returning [StepOutcome::Finish] ends the run successfully
//! - a failing step ends the run with [RunResult::Failed], unless it was
//!   marked [Step::tolerate_failure], in which case the error is logged and
//!   execution continues
//!
//! Nothing is rolled back after a failure; every side effect a step performs is
//! safe to repeat on a later run.

pub mod context;
pub mod decision;
pub mod publish;
pub mod release;

pub use context::Services;
pub use publish::{run_publish, PublishArgs};
pub use release::{run_release, ReleaseArgs};
pub use test::{run_test, TestArgs};

use crate::error::{ReleaseError, Result};
use crate::ui::ReplayLogger;

/// What the executor does after a step succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Stop here; the run succeeded with this summary
    Finish(String),
}

pub type Guard<C> = fn(&C) -> bool;
pub type Action<C> = fn(&mut C) -> Result<StepOutcome>;

/// A named unit of work in a pipeline
pub struct Step<C> {
    pub name: &'static str,
    guard: Option<Guard<C>>,
    action: Action<C>,
    abort_on_failure: bool,
}

impl<C> Step<C> {
    pub fn new(name: &'static str, action: Action<C>) -> Self {
        Step {
            name,
            guard: None,
            action,
            abort_on_failure: true,
        }
    }

    /// Only run the step when `guard` holds
    pub fn when(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Log a failure of this step instead of aborting the run
    pub fn tolerate_failure(mut self) -> Self {
        self.abort_on_failure = false;
        self
    }
}

/// Terminal state of a pipeline run
#[derive(Debug)]
pub enum RunResult {
    Succeeded {
        summary: String,
        /// Names of the steps that ran to completion, in order
        completed: Vec<&'static str>,
    },
    Failed {
        step: &'static str,
        error: ReleaseError,
    },
}

impl RunResult {
    pub fn failed(step: &'static str, error: ReleaseError) -> Self {
        RunResult::Failed { step, error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Succeeded { .. })
    }

    /// Summary on success, the originating error on failure
    pub fn into_result(self) -> Result<String> {
        match self {
            RunResult::Succeeded { summary, .. } => Ok(summary),
            RunResult::Failed { error, .. } => Err(error),
        }
    }
}

/// An ordered list of steps
pub struct Pipeline<C> {
    name: &'static str,
    steps: Vec<Step<C>>,
}

impl<C> Pipeline<C> {
    pub fn new(name: &'static str) -> Self {
        Pipeline {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, step: Step<C>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name).collect()
    }

    pub fn run(&self, ctx: &mut C, logger: &ReplayLogger) -> RunResult {
        let mut completed = Vec::new();

        for step in &self.steps {
            if let Some(guard) = step.guard {
                if !guard(ctx) {
                    log::debug!("{}: skipping step {}", self.name, step.name);
                    continue;
                }
            }

            log::debug!("{}: running step {}", self.name, step.name);
            match (step.action)(ctx) {
                Ok(StepOutcome::Continue) => completed.push(step.name),
                Ok(StepOutcome::Finish(summary)) => {
                    completed.push(step.name);
                    return RunResult::Succeeded { summary, completed };
                }
                Err(error) if !step.abort_on_failure => {
                    logger.error(step.name, format!("{} (ignored)", error));
                    completed.push(step.name);
                }
                Err(error) => {
                    logger.error(step.name, error.to_string());
                    return RunResult::failed(step.name, error);
                }
            }
        }

        RunResult::Succeeded {
            summary: format!("{} completed", self.name),
            completed,
        }
    }
}
