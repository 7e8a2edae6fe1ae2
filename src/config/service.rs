//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/listpull-deploy/config.toml.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("listpull-deploy")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// If the file doesn't exist, creates default configuration file.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // If log_path was not explicitly set in config, use config file directory
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        r#"# listpull-deploy configuration file

# Enable debug logging to file (default: false)
debug = false

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/listpull-deploy/logs"

# Project root containing Dockerfile and docker-compose.yml
# (default: current directory; --project-dir overrides)
# project_dir = "/opt/listpull"

# Environment file written inside the project root
env_file = ".env"

# Files that must exist in the project root
required_files = ["Dockerfile", "docker-compose.yml", "package.json"]

# Port the application is published on (used in the summary URL)
app_port = 3000

# Missing marker only produces a warning
debian_marker = "/etc/debian_version"

[health]
url = "http://localhost:3000/api/health"
timeout_secs = 90
interval_secs = 2
request_timeout_secs = 5

[docker]
gpg_url = "https://download.docker.com/linux/debian/gpg"
repo_url = "https://download.docker.com/linux/debian"
arch = "amd64"
keyring_dir = "/etc/apt/keyrings"
keyring_file = "docker.gpg"
source_list = "/etc/apt/sources.list.d/docker.list"
prerequisites = ["ca-certificates", "curl", "gnupg", "lsb-release"]
packages = ["docker-ce", "docker-ce-cli", "containerd.io", "docker-compose-plugin"]

# Codenames Docker does not publish yet, mapped to the nearest stable release
[docker.codename_aliases]
trixie = "bookworm"
sid = "bookworm"
"#
        .to_string()
    }
}
