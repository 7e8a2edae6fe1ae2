//! Docker engine installation from the official apt repository.

use std::fs;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::DockerSettings;
use crate::domain::style;
use crate::domain::{CommandRunner, CommandSpec, DeployError};

const KEY_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads the repository signing key.
pub type KeyFetcher = fn(&str) -> Result<Vec<u8>, DeployError>;

/// Fetch a URL over HTTPS and return the body.
pub fn fetch_signing_key(url: &str) -> Result<Vec<u8>, DeployError> {
    let key_err = |source: reqwest::Error| DeployError::KeyFetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(KEY_FETCH_TIMEOUT)
        .user_agent(concat!("listpull-deploy/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(key_err)?;

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(key_err)?;

    debug!(url, size = bytes.len(), "Fetched signing key");
    Ok(bytes.to_vec())
}

/// Installs Docker on Debian when it is not already present.
pub struct DockerInstaller<'a, R: CommandRunner> {
    runner: &'a R,
    settings: &'a DockerSettings,
    fetch_key: KeyFetcher,
}

impl<'a, R: CommandRunner> DockerInstaller<'a, R> {
    pub fn new(runner: &'a R, settings: &'a DockerSettings) -> Self {
        Self {
            runner,
            settings,
            fetch_key: fetch_signing_key,
        }
    }

    /// Replace the HTTPS key download.
    #[cfg(test)]
    pub fn with_key_fetcher(mut self, fetch_key: KeyFetcher) -> Self {
        self.fetch_key = fetch_key;
        self
    }

    /// Whether a `docker` binary is resolvable.
    pub fn is_installed(&self) -> bool {
        self.runner.probe("which", &["docker"])
    }

    /// Install Docker unless present. Returns `true` when an installation ran.
    pub fn ensure(&self) -> Result<bool, DeployError> {
        if self.is_installed() {
            info!("Docker already installed");
            println!("{}", style::success("Docker is already installed"));
            return Ok(false);
        }
        self.install()?;
        Ok(true)
    }

    /// Run the full installation sequence, stopping at the first failure.
    pub fn install(&self) -> Result<(), DeployError> {
        println!("{}", style::step("Installing Docker..."));
        info!("Installing Docker");

        println!("  Updating package index...");
        self.apt(["update", "-qq"])?;

        println!("  Installing prerequisites...");
        self.apt_install(&self.settings.prerequisites)?;

        println!("  Adding Docker GPG key...");
        self.add_signing_key()?;

        println!("  Adding Docker repository...");
        self.add_repository()?;

        println!("  Installing Docker packages...");
        self.apt(["update", "-qq"])?;
        self.apt_install(&self.settings.packages)?;

        self.runner
            .run(&CommandSpec::new("systemctl", ["start", "docker"]))?;
        self.runner
            .run(&CommandSpec::new("systemctl", ["enable", "docker"]))?;

        info!("Docker installed");
        println!("{}", style::success("Docker installed successfully"));
        Ok(())
    }

    /// Map a release codename through the alias table.
    pub fn resolve_codename(&self, raw: &str) -> String {
        let raw = raw.trim();
        self.settings
            .codename_aliases
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    /// apt source line for the given codename.
    pub fn source_line(&self, codename: &str) -> String {
        format!(
            "deb [arch={} signed-by={}] {} {} stable",
            self.settings.arch,
            self.settings.keyring_path().display(),
            self.settings.repo_url,
            codename
        )
    }

    fn apt<const N: usize>(&self, args: [&str; N]) -> Result<(), DeployError> {
        self.runner.run(&CommandSpec::new("apt-get", args))?;
        Ok(())
    }

    fn apt_install(&self, packages: &[String]) -> Result<(), DeployError> {
        let args = ["install", "-y", "-qq"]
            .into_iter()
            .map(String::from)
            .chain(packages.iter().cloned());
        self.runner.run(&CommandSpec::new("apt-get", args))?;
        Ok(())
    }

    fn add_signing_key(&self) -> Result<(), DeployError> {
        fs::create_dir_all(&self.settings.keyring_dir)?;

        let armored = (self.fetch_key)(&self.settings.gpg_url)?;
        let keyring = self.settings.keyring_path();
        let keyring_arg = keyring.display().to_string();
        self.runner.run(
            &CommandSpec::new(
                "gpg",
                ["--batch", "--yes", "--dearmor", "-o", keyring_arg.as_str()],
            )
            .with_stdin(armored),
        )?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&keyring, fs::Permissions::from_mode(0o644))?;
        }
        Ok(())
    }

    fn add_repository(&self) -> Result<(), DeployError> {
        let output = self
            .runner
            .run(&CommandSpec::new("lsb_release", ["-cs"]).captured())?;
        let codename = self.resolve_codename(&output.stdout);
        debug!(raw = %output.stdout.trim(), resolved = %codename, "Resolved release codename");

        if let Some(parent) = self.settings.source_list.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(
            &self.settings.source_list,
            format!("{}\n", self.source_line(&codename)),
        )?;
        Ok(())
    }
}
