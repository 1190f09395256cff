//! Publish workflow: validate, verify, test, then publish and tag the current
//! version of the module

use std::path::Path;

use super::context::{
    check_dependencies, current_branch, remove_installed_dependencies, verify_workspace,
    version_commit_message, Services,
};
use super::test::{test_project, TestArgs};
use super::{decision, Pipeline, RunResult, Step, StepOutcome};
use crate::domain::policy;
use crate::error::Result;
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::project::Project;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishArgs {
    /// Reset the workspace and remove installed dependencies before anything else
    pub clean: bool,
    /// Publish to the public registry instead of the project's write registry
    pub public: bool,
    pub skip_tests: bool,
    pub skip_git_checks: bool,
}

struct PublishRun<'a> {
    services: Services<'a>,
    args: PublishArgs,
    project: Project,
}

impl PublishRun<'_> {
    fn module(&self) -> String {
        format!(
            "{}@{}",
            self.project.manifest.name,
            self.project.manifest.version_string()
        )
    }
}

fn validate(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let version = run.project.manifest.parsed_version()?;
    let branch = current_branch(&run.project)?;
    policy::validate_branch_version(branch, version)?;
    policy::ensure_credentials(&run.project.info.user_config)?;

    run.services
        .logger
        .info("publish", format!("Publishing {} from {}", run.module(), branch));
    Ok(StepOutcome::Continue)
}

fn check_module_dependencies(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    check_dependencies(&run.services, &run.project, false)?;
    Ok(StepOutcome::Continue)
}

fn check_installed_dependencies(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    check_dependencies(&run.services, &run.project, true)?;
    Ok(StepOutcome::Continue)
}

fn cleaning(run: &PublishRun<'_>) -> bool {
    run.args.clean
}

fn clean(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    run.services.git(&run.project.info.root).reset_workspace()?;
    remove_installed_dependencies(&run.services, &run.project.info)?;
    Ok(StepOutcome::Continue)
}

fn verify(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    verify_workspace(&run.services, &run.project, run.args.skip_git_checks)?;
    Ok(StepOutcome::Continue)
}

fn detect_changes(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let tag = run.project.manifest.parsed_version()?.tag_name();
    let git = run.services.git(&run.project.info.root);

    if decision::has_changes_since(git, &tag)? {
        return Ok(StepOutcome::Continue);
    }

    Ok(StepOutcome::Finish(format!(
        "No changes have been made since the last publish! {} is already tagged {}",
        run.module(),
        tag
    )))
}

fn install(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let info = &run.project.info;
    run.services.npm(&info.root).install(&info.registry_read)?;
    Ok(StepOutcome::Continue)
}

fn testing(run: &PublishRun<'_>) -> bool {
    !run.args.skip_tests
}

fn run_tests(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    test_project(run.services, run.project.info.clone(), TestArgs::default()).into_result()?;
    Ok(StepOutcome::Continue)
}

/// Move to the next patch when the current version is already taken
fn resolve_version(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let services = run.services;
    let current = run.project.manifest.version_string();
    let name = run.project.manifest.name.clone();

    if !decision::is_published(
        services.registry,
        &run.project.info.registry_read,
        &name,
        &current,
        services.logger,
    ) {
        return Ok(StepOutcome::Continue);
    }

    let bumped = decision::bump_patch(&mut run.project.manifest)?;
    services.logger.info(
        "publish",
        format!("{}@{} is already published, moving to {}", name, current, bumped),
    );

    let branch = current_branch(&run.project)?;
    let git = services.git(&run.project.info.root);
    git.commit_all(&version_commit_message(&bumped))?;
    git.push(branch)?;
    Ok(StepOutcome::Continue)
}

fn has_before_publish_hook(run: &PublishRun<'_>) -> bool {
    run.services.config.scripts.before_publish.is_some()
}

fn before_publish(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let scripts = &run.services.config.scripts;
    let Some(script) = scripts.before_publish.as_deref() else {
        return Ok(StepOutcome::Continue);
    };

    let root = &run.project.info.root;
    let cwd = match &scripts.before_publish_cwd {
        Some(dir) => root.join(dir),
        None => root.clone(),
    };
    let version = run.project.manifest.parsed_version()?;
    let context = HookContext {
        hook_type: HookType::BeforePublish,
        module: run.project.manifest.name.clone(),
        version: version.to_string(),
        branch: current_branch(&run.project)?.to_string(),
        tag: version.tag_name(),
    };

    HookExecutor::execute(&run.services.spawner(root), script, &cwd, &context)?;
    Ok(StepOutcome::Continue)
}

fn publish(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let info = &run.project.info;
    let registry = if run.args.public {
        &info.registry_public
    } else {
        &info.registry_write
    };

    run.services
        .npm(&info.root)
        .publish(registry, &info.user_config)?;
    run.services
        .logger
        .success("npm", format!("Published {} to {}", run.module(), registry));
    Ok(StepOutcome::Continue)
}

fn tag(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    let tag = run.project.manifest.parsed_version()?.tag_name();
    let branch = current_branch(&run.project)?;
    let git = run.services.git(&run.project.info.root);

    git.pull(branch)?;
    git.create_tag(&tag)?;
    git.push_tags(branch)?;
    Ok(StepOutcome::Continue)
}

fn report(run: &mut PublishRun<'_>) -> Result<StepOutcome> {
    Ok(StepOutcome::Finish(format!(
        "Module {} successfully published!",
        run.module()
    )))
}

fn pipeline<'a>() -> Pipeline<PublishRun<'a>> {
    Pipeline::new("publish")
        .step(Step::new("validate", validate))
        .step(Step::new("deps", check_module_dependencies))
        .step(Step::new("clean", clean).when(cleaning))
        .step(Step::new("git", verify))
        .step(Step::new("changes", detect_changes))
        .step(Step::new("install", install))
        .step(Step::new("installed-deps", check_installed_dependencies))
        .step(Step::new("test", run_tests).when(testing))
        .step(Step::new("version", resolve_version))
        .step(Step::new("hook", before_publish).when(has_before_publish_hook))
        .step(Step::new("npm", publish))
        .step(Step::new("tag", tag))
        .step(Step::new("report", report))
}

/// Publish the module at `root`
pub fn run_publish(services: Services<'_>, root: &Path, args: PublishArgs) -> RunResult {
    let project = match services.inspect(root) {
        Ok(project) => project,
        Err(err) => {
            services.logger.error("init", err.to_string());
            return RunResult::failed("init", err);
        }
    };

    let mut run = PublishRun {
        services,
        args,
        project,
    };
    pipeline().run(&mut run, services.logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(
            pipeline().step_names(),
            vec![
                "validate",
                "deps",
                "clean",
                "git",
                "changes",
                "install",
                "installed-deps",
                "test",
                "version",
                "hook",
                "npm",
                "tag",
                "report",
            ]
        );
    }
}
