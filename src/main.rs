use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use module_release::cli::{run_workflow, Workflow, WorkflowArgs};
use module_release::pipeline::{PublishArgs, ReleaseArgs, TestArgs};
use module_release::ui::{self, ReplayLogger};

#[derive(Parser)]
#[command(
    name = "module-release",
    version,
    about = "Test, publish and release npm modules from git branches"
)]
struct Args {
    #[arg(long, global = true, default_value = ".", help = "Project root directory")]
    cwd: PathBuf,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Publish the current version of the module and tag it
    Publish {
        #[arg(long, help = "Reset the workspace and remove node_modules first")]
        clean: bool,

        #[arg(long, help = "Publish to the public registry")]
        public: bool,

        #[arg(long, help = "Do not run the module's tests")]
        skip_tests: bool,

        #[arg(long, help = "Do not check that the workspace is clean and in sync")]
        skip_git_checks: bool,
    },

    /// Cut a release branch from trunk, publish it and advance trunk
    Release {
        #[arg(long, help = "Do not run the module's tests")]
        skip_tests: bool,
    },

    /// Run the module's tests
    Test {
        #[arg(long, help = "Reinstall dependencies from scratch first")]
        clean: bool,
    },
}

impl Command {
    fn into_workflow(self) -> Workflow {
        match self {
            Command::Publish {
                clean,
                public,
                skip_tests,
                skip_git_checks,
            } => Workflow::Publish(PublishArgs {
                clean,
                public,
                skip_tests,
                skip_git_checks,
            }),
            Command::Release { skip_tests } => Workflow::Release(ReleaseArgs { skip_tests }),
            Command::Test { clean } => Workflow::Test(TestArgs { clean }),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_args = WorkflowArgs {
        root: args.cwd,
        config_path: args.config,
        workflow: args.command.into_workflow(),
    };

    ui::display_status(&format!(
        "Running {} in {}",
        workflow_args.workflow.name(),
        workflow_args.root.display()
    ));

    let logger = ReplayLogger::new();
    match run_workflow(workflow_args, &logger) {
        Ok(result) => {
            logger.summarize();
            ui::display_success(&result.summary);
            Ok(())
        }
        Err(e) => {
            logger.summarize();
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
