//! listpull-deploy: provisioning tool for self-hosted ListPull
//!
//! Installs Docker on Debian if needed, collects the application settings,
//! writes the `.env` file, builds and starts the containers, then waits for
//! the health endpoint and prints a summary.

mod cli;
mod config;
mod domain;
mod service;

use std::process;

use anyhow::{bail, Result};
use clap::Parser;

use cli::{Cli, Commands};
use config::ConfigService;
use domain::style;
use service::{DeployOptions, DeployService};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", style::error(&format!("{:#}", e)));
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that never need a loaded configuration
    match &cli.command {
        Some(Commands::Version) => {
            println!("listpull-deploy {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Commands::Init { path }) => {
            let config_path = match path {
                Some(p) => {
                    ConfigService::generate_at(p)?;
                    p.clone()
                }
                None => {
                    ConfigService::generate_default()?;
                    ConfigService::default_path()
                }
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
            return Ok(());
        }
        _ => {}
    }

    let config = ConfigService::load(cli.config.as_deref())?;

    if cli.debug || config.debug {
        domain::logger::init(&config)?;
    }

    let project_dir = match cli.project_dir.clone().or_else(|| config.project_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let options = DeployOptions {
        non_interactive: cli.non_interactive,
        project_dir,
    };

    match cli.command.unwrap_or(Commands::Deploy) {
        Commands::Deploy => {
            if !cli.quiet {
                println!("{}", style::banner());
            }
            DeployService::new(config, options).run()?;
        }
        Commands::Configure => {
            if !cli.quiet {
                println!("{}", style::banner());
            }
            DeployService::new(config, options).configure()?;
        }
        Commands::Health { timeout } => {
            let service = DeployService::new(config, options);
            if service.wait_for_healthy(timeout)? {
                println!("{}", style::success("Application is running and healthy"));
            } else {
                bail!("Application did not become healthy before the timeout");
            }
        }
        Commands::Check => {
            config::validate(&config)?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        // Handled before loading configuration
        Commands::Version | Commands::Init { .. } => {}
    }

    Ok(())
}
