use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::process::{Invocation, ProcessOutput, ProcessRunner};

/// Runs commands as real child processes and captures their output
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);

        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|e| ReleaseError::ExternalProcess {
            command: invocation.command_line(),
            code: -1,
            stderr: format!("failed to start: {}", e),
        })?;

        Ok(ProcessOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
