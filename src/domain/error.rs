//! Error types for listpull-deploy.

use thiserror::Error;

/// Fatal deployment error.
///
/// Every variant aborts the run with exit code 1. Wrapped causes are exposed
/// through `source()` and are not repeated in the message.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Effective user is not root
    #[error("This script must be run as root (use sudo)")]
    NotPrivileged,

    /// A file the project must ship is missing
    #[error("Required file not found: {0}\nMake sure you're running from the correct directory")]
    MissingFile(String),

    /// Neither `docker compose` nor `docker-compose` is usable
    #[error("Docker Compose not found")]
    ComposeNotFound,

    /// A child process exited unsuccessfully
    #[error("Command failed: {command}{}", stderr_suffix(.stderr))]
    CommandFailed { command: String, stderr: String },

    /// A child process could not be started at all
    #[error("Failed to run `{command}`")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Downloading the repository signing key failed
    #[error("Failed to fetch signing key from {url}")]
    KeyFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client setup failed
    #[error("HTTP client error")]
    Http(#[from] reqwest::Error),

    /// Environment variable set to bytes that are not UTF-8
    #[error("{key} is set but is not valid UTF-8")]
    InvalidEnv { key: String },

    /// Required field left empty in non-interactive mode
    #[error("{key} is required. Set it via environment variable.")]
    MissingRequired { key: String },

    /// Required field left empty at the prompt
    #[error("{prompt} is required")]
    RequiredInput { prompt: String },

    /// I/O error
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}
