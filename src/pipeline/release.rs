//! Release workflow
//!
//! Cuts a `vMAJOR.MINOR` branch from the trunk, publishes the final version
//! from it, then moves the trunk on to the next minor pre-release:
//!
//! ```text
//! master 1.4.0-beta ──checkout -b v1.4──> v1.4 1.4.0 (published, tagged v1.4.0)
//!        └──checkout master──> master 1.5.0-beta
//! ```

use std::path::{Path, PathBuf};

use super::context::{
    check_dependencies, current_branch, remove_installed_dependencies, verify_workspace,
    version_commit_message, Services,
};
use super::publish::{run_publish, PublishArgs};
use super::test::{test_project, TestArgs};
use super::{Pipeline, RunResult, Step, StepOutcome};
use crate::domain::{policy, ReleaseBranch};
use crate::error::Result;
use crate::git::GitGuard;
use crate::project::Project;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseArgs {
    pub skip_tests: bool,
}

struct ReleaseRun<'a> {
    services: Services<'a>,
    args: ReleaseArgs,
    root: PathBuf,
    /// Snapshot of the branch currently checked out
    project: Project,
    released: Option<String>,
}

impl ReleaseRun<'_> {
    /// Switch the snapshot to whatever the working copy now holds
    fn reinspect(&mut self) -> Result<()> {
        self.project = self.services.inspect(&self.root)?;
        Ok(())
    }
}

fn validate(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    let version = run.project.manifest.parsed_version()?;
    let branch = current_branch(&run.project)?;
    policy::validate_release_origin(branch, &run.services.config.trunk_branch, version)?;
    policy::validate_branch_version(branch, version)?;
    policy::ensure_credentials(&run.project.info.user_config)?;

    run.services.logger.info(
        "release",
        format!(
            "Releasing {}@{} from {}",
            run.project.manifest.name, version, branch
        ),
    );
    Ok(StepOutcome::Continue)
}

fn check_module_dependencies(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    check_dependencies(&run.services, &run.project, false)?;
    Ok(StepOutcome::Continue)
}

fn check_installed_dependencies(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    check_dependencies(&run.services, &run.project, true)?;
    Ok(StepOutcome::Continue)
}

fn verify(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    verify_workspace(&run.services, &run.project, false)?;
    Ok(StepOutcome::Continue)
}

/// The release never reuses a previously installed tree
fn remove_dependencies(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    remove_installed_dependencies(&run.services, &run.project.info)?;
    Ok(StepOutcome::Continue)
}

fn testing(run: &ReleaseRun<'_>) -> bool {
    !run.args.skip_tests
}

fn run_tests(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    test_project(run.services, run.project.info.clone(), TestArgs { clean: true }).into_result()?;
    Ok(StepOutcome::Continue)
}

/// Cut the release branch, drop the pre-release label and publish from it
fn create_release_branch(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    let services = run.services;
    let branch = ReleaseBranch::for_version(run.project.manifest.parsed_version()?).name();
    let root = run.root.clone();
    let git = services.git(&root);

    git.create_branch(&branch)?;
    run.reinspect()?;

    let manifest = &mut run.project.manifest;
    manifest.parsed_version_mut()?.strip_label();
    manifest.write()?;
    let released = manifest.version_string();

    git.commit_all(&version_commit_message(&released))?;
    git.push_upstream(&branch)?;
    services.logger.info(
        "release",
        format!("Created release branch {} with version {}", branch, released),
    );

    let publish = PublishArgs {
        skip_tests: run.args.skip_tests,
        ..PublishArgs::default()
    };
    let summary = run_publish(services, &root, publish).into_result()?;
    services.logger.success("release", summary);

    run.released = Some(released);
    Ok(StepOutcome::Continue)
}

/// Return to the trunk and open the next minor pre-release
fn advance_trunk(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    let services = run.services;
    let trunk = services.config.trunk_branch.as_str();
    let root = run.root.clone();
    let git = services.git(&root);

    git.checkout(trunk)?;
    run.reinspect()?;
    GitGuard::new(git).verify(trunk)?;

    let manifest = &mut run.project.manifest;
    let version = manifest.parsed_version_mut()?;
    version.inc_minor();
    version.set_label(services.config.prerelease.next_label.as_str());
    manifest.write()?;
    let next = manifest.version_string();

    git.commit_all(&version_commit_message(&next))?;
    git.push(trunk)?;
    services
        .logger
        .info("release", format!("{} is now at {}", trunk, next));
    Ok(StepOutcome::Continue)
}

fn report(run: &mut ReleaseRun<'_>) -> Result<StepOutcome> {
    let released = run.released.as_deref().unwrap_or_default();
    Ok(StepOutcome::Finish(format!(
        "Release completed! {}@{} published, {} is now at {}",
        run.project.manifest.name,
        released,
        run.services.config.trunk_branch,
        run.project.manifest.version_string()
    )))
}

fn pipeline<'a>() -> Pipeline<ReleaseRun<'a>> {
    Pipeline::new("release")
        .step(Step::new("validate", validate))
        .step(Step::new("deps", check_module_dependencies))
        .step(Step::new("git", verify))
        .step(Step::new("delete", remove_dependencies))
        .step(Step::new("installed-deps", check_installed_dependencies))
        .step(Step::new("test", run_tests).when(testing))
        .step(Step::new("branch", create_release_branch))
        .step(Step::new("trunk", advance_trunk))
        .step(Step::new("report", report))
}

/// Release the module at `root` from the trunk branch
pub fn run_release(services: Services<'_>, root: &Path, args: ReleaseArgs) -> RunResult {
    let project = match services.inspect(root) {
        Ok(project) => project,
        Err(err) => {
            services.logger.error("init", err.to_string());
            return RunResult::failed("init", err);
        }
    };

    let mut run = ReleaseRun {
        services,
        args,
        root: root.to_path_buf(),
        project,
        released: None,
    };
    pipeline().run(&mut run, services.logger)
}
