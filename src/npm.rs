//! Package-manager commands

use std::path::Path;

use crate::error::Result;
use crate::process::Spawner;

const NPM: &str = "npm";

/// npm command-line wrapper bound to a project directory
#[derive(Clone, Copy)]
pub struct Npm<'a> {
    spawner: Spawner<'a>,
}

impl<'a> Npm<'a> {
    pub fn new(spawner: Spawner<'a>) -> Self {
        Npm { spawner }
    }

    pub fn install(&self, registry: &str) -> Result<()> {
        self.spawner
            .spawn(NPM, &["install", "--registry", registry])
            .map(drop)
    }

    pub fn publish(&self, registry: &str, user_config: &Path) -> Result<()> {
        let user_config = user_config.to_string_lossy();
        self.spawner
            .spawn(
                NPM,
                &[
                    "publish",
                    "--tag",
                    "latest",
                    "--registry",
                    registry,
                    "--userconfig",
                    &user_config,
                ],
            )
            .map(drop)
    }

    pub fn test(&self) -> Result<()> {
        self.spawner.spawn(NPM, &["test"]).map(drop)
    }

    pub fn cache_clean(&self) -> Result<()> {
        self.spawner.spawn(NPM, &["cache", "clean"]).map(drop)
    }
}
