//! Configuration validation.

use anyhow::{bail, Result};
use regex::Regex;

use super::Config;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Validate log path
    if !config.log_path.as_os_str().is_empty() {
        // Path will be created if it doesn't exist, so just check it's valid
        if config.log_path.to_string_lossy().contains('\0') {
            bail!("Invalid log_path: contains null character");
        }
    }

    if config.env_file.is_empty() {
        bail!("env_file cannot be empty");
    }
    if config.env_file.contains('/') || config.env_file.contains('\\') {
        bail!(
            "env_file '{}' must be a file name, not a path",
            config.env_file
        );
    }

    for (i, file) in config.required_files.iter().enumerate() {
        if file.is_empty() {
            bail!("required_files[{}]: file name cannot be empty", i);
        }
    }

    if config.app_port == 0 {
        bail!("app_port must be greater than 0");
    }

    // Validate health settings
    let health = &config.health;
    if !(health.url.starts_with("http://") || health.url.starts_with("https://")) {
        bail!(
            "health.url '{}' must start with http:// or https://",
            health.url
        );
    }
    if health.timeout_secs == 0 {
        bail!("health.timeout_secs must be greater than 0");
    }
    if health.interval_secs == 0 {
        bail!("health.interval_secs must be greater than 0");
    }
    if health.request_timeout_secs == 0 {
        bail!("health.request_timeout_secs must be greater than 0");
    }

    // Validate docker settings
    let docker = &config.docker;
    if docker.arch.is_empty() {
        bail!("docker.arch cannot be empty");
    }
    if docker.keyring_file.is_empty() {
        bail!("docker.keyring_file cannot be empty");
    }
    if docker.packages.is_empty() {
        bail!("docker.packages cannot be empty");
    }
    for (i, package) in docker.packages.iter().enumerate() {
        if package.is_empty() {
            bail!("docker.packages[{}]: package name cannot be empty", i);
        }
    }

    let codename = Regex::new(r"^[a-z][a-z0-9-]*$")?;
    for (from, to) in &docker.codename_aliases {
        if !codename.is_match(from) {
            bail!("docker.codename_aliases: invalid codename '{}'", from);
        }
        if !codename.is_match(to) {
            bail!(
                "docker.codename_aliases['{}']: invalid target codename '{}'",
                from,
                to
            );
        }
    }

    Ok(())
}
