//! Deployment workflow.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{logger, style};
use crate::domain::{env_file, CommandRunner, ConfigRecord, DeployError, SystemRunner};
use crate::service::collector::{self, EnvironmentSource, PromptSource};
use crate::service::compose::{self, ComposeCommand};
use crate::service::docker_installer::DockerInstaller;
use crate::service::health::HealthPoller;
use crate::service::preflight;
use crate::service::summary::{self, Summary};

/// Runtime choices taken from the command line.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Take values from the environment instead of prompting
    pub non_interactive: bool,
    /// Project root containing the Dockerfile and compose file
    pub project_dir: PathBuf,
}

/// Service running the provisioning steps.
pub struct DeployService<R: CommandRunner = SystemRunner> {
    config: Config,
    options: DeployOptions,
    runner: R,
    is_privileged: fn() -> bool,
}

impl DeployService<SystemRunner> {
    pub fn new(config: Config, options: DeployOptions) -> Self {
        Self::with_runner(config, options, SystemRunner)
    }
}

impl<R: CommandRunner> DeployService<R> {
    pub fn with_runner(config: Config, options: DeployOptions, runner: R) -> Self {
        Self {
            config,
            options,
            runner,
            is_privileged: preflight::is_privileged,
        }
    }

    /// Replace the effective-uid check.
    #[cfg(test)]
    pub fn with_privilege_check(mut self, is_privileged: fn() -> bool) -> Self {
        self.is_privileged = is_privileged;
        self
    }

    /// Location of the environment file.
    pub fn env_path(&self) -> PathBuf {
        self.options.project_dir.join(&self.config.env_file)
    }

    /// Full workflow. Stops at the first failing step.
    pub fn run(&self) -> Result<(), DeployError> {
        info!(
            project_dir = %self.options.project_dir.display(),
            non_interactive = self.options.non_interactive,
            "Starting deployment"
        );

        {
            let _step = logger::step_span("preflight");
            preflight::require_root(self.is_privileged)?;
            if !preflight::is_debian(&self.config.debian_marker) {
                println!(
                    "{}",
                    style::warning("This script is designed for Debian. Proceeding anyway...")
                );
            }
        }

        let project_dir = self.options.project_dir.as_path();
        println!("Project directory: {}", project_dir.display());
        preflight::check_required_files(project_dir, &self.config.required_files)?;

        let compose = {
            let _step = logger::step_span("docker");
            DockerInstaller::new(&self.runner, &self.config.docker).ensure()?;
            ComposeCommand::require(&self.runner)?
        };
        info!(compose = compose.display(), "Compose available");

        let record = {
            let _step = logger::step_span("configure");
            self.configure()?
        };

        {
            let _step = logger::step_span("build");
            compose::build_and_start(&self.runner, compose, project_dir, &record)?;
        }

        let healthy = {
            let _step = logger::step_span("health");
            self.wait_for_healthy(None)?
        };
        if healthy {
            println!("{}", style::success("Application is running and healthy"));
        } else {
            println!("{}", style::warning("Application may still be starting."));
            println!(
                "{}",
                style::warning(&format!(
                    "Check logs with: {} logs -f",
                    compose.display()
                ))
            );
        }

        self.print_summary(project_dir, &record);
        info!("Deployment finished");
        Ok(())
    }

    /// Collect settings in the selected mode and write the environment file.
    pub fn configure(&self) -> Result<ConfigRecord, DeployError> {
        let record = self.collect()?;
        let path = self.env_path();
        env_file::write(&path, &record)?;
        println!(
            "{}",
            style::success(&format!("Configuration written to {}", path.display()))
        );
        Ok(record)
    }

    fn collect(&self) -> Result<ConfigRecord, DeployError> {
        if self.options.non_interactive {
            println!("{}", style::step("Using default/environment configuration..."));
            let mut source = EnvironmentSource::from_env(io::stdout());
            return collector::collect(&mut source);
        }

        println!("{}", style::step("Configuration"));
        println!("Press Enter to accept defaults shown in brackets.\n");
        let stdin = io::stdin();
        let mut source = PromptSource::new(stdin.lock(), io::stdout());
        collector::collect(&mut source)
    }

    /// Poll the health endpoint, printing a dot per retry.
    pub fn wait_for_healthy(&self, timeout_override: Option<u64>) -> Result<bool, DeployError> {
        let health = &self.config.health;
        let timeout = timeout_override
            .map(Duration::from_secs)
            .unwrap_or_else(|| health.timeout());
        let poller = HealthPoller::new(
            health.url.clone(),
            timeout,
            health.interval(),
            health.request_timeout(),
        )?;

        println!(
            "{}",
            style::step(&format!(
                "Waiting for application to start (timeout: {}s)...",
                poller.timeout().as_secs()
            ))
        );

        let healthy = poller.wait(|| {
            print!(".");
            let _ = io::stdout().flush();
        });
        println!();

        if !healthy {
            warn!(url = %self.config.health.url, "Application did not report healthy");
        }
        Ok(healthy)
    }

    fn print_summary(&self, project_dir: &Path, record: &ConfigRecord) {
        let env_path = self.env_path();
        let summary = Summary {
            address: summary::local_address(&self.runner),
            port: self.config.app_port,
            project_dir,
            env_path: &env_path,
            record,
        };
        println!("{}", summary.render());
    }
}
