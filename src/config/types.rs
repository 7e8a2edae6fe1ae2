//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::validation;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Project root containing the Dockerfile and compose file.
    /// Falls back to the current directory when unset.
    pub project_dir: Option<PathBuf>,

    /// Name of the environment file written inside the project root
    pub env_file: String,

    /// Files that must exist in the project root before deploying
    pub required_files: Vec<String>,

    /// Port the application is published on
    pub app_port: u16,

    /// File whose presence identifies a Debian host
    pub debian_marker: PathBuf,

    /// Health polling settings
    pub health: HealthSettings,

    /// Docker repository and package settings
    pub docker: DockerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            project_dir: None,
            env_file: ".env".to_string(),
            required_files: vec![
                "Dockerfile".to_string(),
                "docker-compose.yml".to_string(),
                "package.json".to_string(),
            ],
            app_port: 3000,
            debian_marker: PathBuf::from("/etc/debian_version"),
            health: HealthSettings::default(),
            docker: DockerSettings::default(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    /// Delegates to the comprehensive validation module.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// Health endpoint polling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Endpoint that answers 200 once the application is ready
    pub url: String,

    /// Overall wall-clock budget in seconds
    pub timeout_secs: u64,

    /// Delay between attempts in seconds
    pub interval_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/api/health".to_string(),
            timeout_secs: 90,
            interval_secs: 2,
            request_timeout_secs: 5,
        }
    }
}

impl HealthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Docker apt repository settings.
///
/// # Examples
///
/// Track a newer stable release for testing hosts:
/// ```toml
/// [docker.codename_aliases]
/// trixie = "trixie"
/// sid = "trixie"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DockerSettings {
    /// Repository signing key (ASCII armored)
    pub gpg_url: String,

    /// Base URL of the apt repository
    pub repo_url: String,

    /// Architecture written into the source line
    pub arch: String,

    /// Directory holding apt keyrings
    pub keyring_dir: PathBuf,

    /// File name of the dearmored keyring inside `keyring_dir`
    pub keyring_file: String,

    /// apt source list written for the repository
    pub source_list: PathBuf,

    /// Packages installed before adding the repository
    pub prerequisites: Vec<String>,

    /// Docker packages installed from the repository
    pub packages: Vec<String>,

    /// Codenames without a Docker release, mapped to the nearest stable one
    pub codename_aliases: BTreeMap<String, String>,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            gpg_url: "https://download.docker.com/linux/debian/gpg".to_string(),
            repo_url: "https://download.docker.com/linux/debian".to_string(),
            arch: "amd64".to_string(),
            keyring_dir: PathBuf::from("/etc/apt/keyrings"),
            keyring_file: "docker.gpg".to_string(),
            source_list: PathBuf::from("/etc/apt/sources.list.d/docker.list"),
            prerequisites: ["ca-certificates", "curl", "gnupg", "lsb-release"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            packages: [
                "docker-ce",
                "docker-ce-cli",
                "containerd.io",
                "docker-compose-plugin",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            codename_aliases: BTreeMap::from([
                ("trixie".to_string(), "bookworm".to_string()),
                ("sid".to_string(), "bookworm".to_string()),
            ]),
        }
    }
}

impl DockerSettings {
    /// Full path of the dearmored keyring.
    pub fn keyring_path(&self) -> PathBuf {
        self.keyring_dir.join(&self.keyring_file)
    }
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("listpull-deploy")
        })
        .join("logs")
}
