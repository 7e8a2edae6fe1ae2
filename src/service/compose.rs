//! Container build and start through compose.

use std::path::Path;

use tracing::info;

use crate::domain::style;
use crate::domain::{CommandRunner, CommandSpec, ConfigRecord, DeployError};

/// Available compose invocation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeCommand {
    /// `docker compose` (CLI plugin)
    Plugin,
    /// `docker-compose` (legacy standalone binary)
    Standalone,
}

impl ComposeCommand {
    /// Prefer the plugin, fall back to the standalone binary.
    pub fn detect<R: CommandRunner>(runner: &R) -> Option<Self> {
        if runner.probe("docker", &["compose", "version"]) {
            Some(Self::Plugin)
        } else if runner.probe("which", &["docker-compose"]) {
            Some(Self::Standalone)
        } else {
            None
        }
    }

    /// Like [`detect`](Self::detect), but absence is an error.
    pub fn require<R: CommandRunner>(runner: &R) -> Result<Self, DeployError> {
        Self::detect(runner).ok_or(DeployError::ComposeNotFound)
    }

    /// Build a compose invocation with the given subcommand arguments.
    pub fn command(&self, args: &[&str]) -> CommandSpec {
        match self {
            Self::Plugin => CommandSpec::new(
                "docker",
                std::iter::once("compose").chain(args.iter().copied()),
            ),
            Self::Standalone => CommandSpec::new("docker-compose", args.iter().copied()),
        }
    }

    /// Human-readable form for messages.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Plugin => "docker compose",
            Self::Standalone => "docker-compose",
        }
    }
}

/// Build the image without cache, then start the service detached.
///
/// Both commands run inside `project_dir` with `record` exported into their environment.
pub fn build_and_start<R: CommandRunner>(
    runner: &R,
    compose: ComposeCommand,
    project_dir: &Path,
    record: &ConfigRecord,
) -> Result<(), DeployError> {
    println!("{}", style::step("Building and starting containers..."));

    let prepare = |args: &[&str]| {
        compose
            .command(args)
            .in_dir(project_dir)
            .with_envs(record.iter())
    };

    println!("  Building Docker image (this may take a few minutes)...");
    info!(compose = compose.display(), dir = %project_dir.display(), "Building image");
    runner.run(&prepare(&["build", "--no-cache"]))?;

    println!("  Starting containers...");
    info!("Starting containers");
    runner.run(&prepare(&["up", "-d"]))?;

    println!("{}", style::success("Containers started"));
    Ok(())
}
