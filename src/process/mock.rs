use std::sync::Mutex;

use crate::error::Result;
use crate::process::{Invocation, ProcessOutput, ProcessRunner};

/// Scripted answer for commands matching a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Exit 0 with the given stdout
    Output(String),
    /// Exit with a non-zero code and the given stderr
    Fail { code: i32, stderr: String },
}

/// Commit hash `git rev-parse HEAD` answers with unless scripted otherwise
pub const DEFAULT_HEAD: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

struct State {
    rules: Vec<(String, Scripted)>,
    calls: Vec<Invocation>,
    branch: String,
}

/// Mock process runner for testing without real git or npm
///
/// Commands are matched against scripted rules by command-line prefix; the
/// most recently added matching rule wins and unmatched commands succeed with
/// empty output. By default `git rev-parse HEAD` answers [DEFAULT_HEAD] and
/// tag lookups fail, i.e. the repository has no tags.
///
/// `git checkout` calls move the tracked current branch, which lets test
/// inspectors report the branch a workflow switched to.
pub struct ScriptedRunner {
    state: Mutex<State>,
}

impl ScriptedRunner {
    pub fn new(branch: impl Into<String>) -> Self {
        let runner = ScriptedRunner {
            state: Mutex::new(State {
                rules: Vec::new(),
                calls: Vec::new(),
                branch: branch.into(),
            }),
        };
        runner
            .on("git rev-parse HEAD", Scripted::Output(format!("{}\n", DEFAULT_HEAD)))
            .on(
                "git rev-parse --verify",
                Scripted::Fail {
                    code: 128,
                    stderr: "fatal: Needed a single revision".to_string(),
                },
            )
    }

    /// Add a rule for commands starting with `prefix`
    pub fn on(self, prefix: impl Into<String>, answer: Scripted) -> Self {
        self.lock().rules.push((prefix.into(), answer));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Command lines of every call so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.iter().map(Invocation::command_line).collect()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().calls.clone()
    }

    /// Index of the first call starting with `prefix`
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }

    pub fn was_called(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }

    /// Branch the repository is currently on, following checkouts
    pub fn branch(&self) -> String {
        self.lock().branch.clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let line = invocation.command_line();
        let mut state = self.lock();
        state.calls.push(invocation.clone());

        let answer = state
            .rules
            .iter()
            .rev()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, answer)| answer.clone())
            .unwrap_or(Scripted::Output(String::new()));

        let output = match answer {
            Scripted::Output(stdout) => ProcessOutput {
                code: 0,
                stdout,
                stderr: String::new(),
            },
            Scripted::Fail { code, stderr } => ProcessOutput {
                code,
                stdout: String::new(),
                stderr,
            },
        };

        if output.success() && invocation.program == "git" {
            match invocation.args.as_slice() {
                [cmd, flag, branch] if cmd == "checkout" && flag == "-b" => {
                    state.branch = branch.clone();
                }
                [cmd, branch] if cmd == "checkout" => state.branch = branch.clone(),
                _ => {}
            }
        }

        Ok(output)
    }
}
