//! External process abstraction layer
//!
//! Every version-control and package-manager command goes through the
//! [ProcessRunner] trait so that workflows can be exercised without touching
//! a real repository or registry.
//!
//! - [system::SystemProcessRunner]: spawns real processes with `std::process`
//! - [mock::ScriptedRunner]: answers from a script, records every call
//!
//! Workflows do not use a runner directly; they go through a [Spawner], which
//! binds a runner to a working directory and the run's logger, and turns a
//! non-zero exit into [ReleaseError::ExternalProcess].

pub mod mock;
pub mod system;

pub use mock::{Scripted, ScriptedRunner, DEFAULT_HEAD};
pub use system::SystemProcessRunner;

use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::ui::ReplayLogger;

/// A command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
            env: Vec::new(),
        }
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// Program and arguments joined by spaces (e.g., "git status --porcelain")
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was terminated by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Executes external commands
///
/// Implementations return `Ok` for any process that ran to completion,
/// whatever its exit code; they return `Err` only when the process could not
/// be started at all.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// A process runner bound to a working directory and a logger
#[derive(Clone, Copy)]
pub struct Spawner<'a> {
    runner: &'a dyn ProcessRunner,
    logger: &'a ReplayLogger,
    cwd: &'a Path,
}

impl<'a> Spawner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, logger: &'a ReplayLogger, cwd: &'a Path) -> Self {
        Spawner {
            runner,
            logger,
            cwd,
        }
    }

    pub fn cwd(&self) -> &'a Path {
        self.cwd
    }

    pub fn logger(&self) -> &'a ReplayLogger {
        self.logger
    }

    /// Run a command and fail on a non-zero exit
    pub fn spawn(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        self.spawn_invocation(Invocation::new(program, args.iter().copied(), self.cwd))
    }

    /// Run a prepared invocation and fail on a non-zero exit
    pub fn spawn_invocation(&self, invocation: Invocation) -> Result<ProcessOutput> {
        let output = self.try_spawn_invocation(&invocation)?;
        if !output.success() {
            return Err(ReleaseError::ExternalProcess {
                command: invocation.command_line(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Run a command whose failure is an expected answer rather than an error
    pub fn try_spawn(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        self.try_spawn_invocation(&Invocation::new(program, args.iter().copied(), self.cwd))
    }

    fn try_spawn_invocation(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        self.logger.info(&invocation.program, invocation.command_line());
        let output = self.runner.run(invocation)?;
        log::debug!(
            "`{}` exited with {} in {}",
            invocation.command_line(),
            output.code,
            invocation.cwd.display()
        );
        Ok(output)
    }
}
