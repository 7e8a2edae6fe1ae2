//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deploy ListPull on Debian
#[derive(Parser)]
#[command(
    name = "listpull-deploy",
    version,
    about = "Deploy ListPull on Debian",
    long_about = "Installs Docker if needed, collects the application configuration, \
                  writes the .env file, builds and starts the containers, and waits \
                  for the health endpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use defaults/environment variables instead of prompting
    #[arg(long, short = 'y', global = true)]
    pub non_interactive: bool,

    /// Project root containing Dockerfile and docker-compose.yml
    #[arg(long, short = 'C', global = true)]
    pub project_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Install Docker, configure, build and start the application (default)
    Deploy,
    /// Collect configuration and write the .env file only
    Configure,
    /// Wait for the application's health endpoint
    Health {
        /// Override the configured timeout in seconds
        #[arg(long, short = 't')]
        timeout: Option<u64>,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
