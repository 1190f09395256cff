use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::hooks::HookContext;
use crate::process::{Invocation, Spawner};

#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");
#[cfg(not(windows))]
const SHELL: (&str, &str) = ("sh", "-c");

/// Executes configured hook scripts through the system shell
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script runs in `cwd` with environment variables set from the
    /// context. Any non-zero exit code fails the hook.
    ///
    /// # Arguments
    /// * `spawner` - Process spawner of the current run
    /// * `script` - Shell command line
    /// * `cwd` - Working directory for the script
    /// * `context` - Hook context with environment variables
    pub fn execute(
        spawner: &Spawner<'_>,
        script: &str,
        cwd: &Path,
        context: &HookContext,
    ) -> Result<()> {
        if script.trim().is_empty() {
            return Err(ReleaseError::hook(format!(
                "{} hook is configured with an empty script",
                context.hook_type.name()
            )));
        }

        if !cwd.is_dir() {
            return Err(ReleaseError::hook(format!(
                "{} hook directory does not exist: {}",
                context.hook_type.name(),
                cwd.display()
            )));
        }

        let (shell, flag) = SHELL;
        let invocation = Invocation::new(shell, [flag, script], cwd)
            .with_env(context.to_env_vars().into_iter().collect());

        spawner.spawn_invocation(invocation).map_err(|e| match e {
            ReleaseError::ExternalProcess { code, stderr, .. } => ReleaseError::hook(format!(
                "{} script `{}` failed with exit code {}\nStderr: {}",
                context.hook_type.name(),
                script,
                code,
                stderr
            )),
            other => other,
        })?;

        Ok(())
    }
}
