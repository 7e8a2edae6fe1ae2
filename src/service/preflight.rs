//! Preflight checks run before anything touches the host.

use std::path::Path;

use tracing::{debug, warn};

use crate::domain::DeployError;

/// Whether the process runs with an effective uid of 0.
pub fn is_privileged() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple POSIX getter that always succeeds and has no side effects.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Fail unless `is_privileged` reports root.
pub fn require_root(is_privileged: fn() -> bool) -> Result<(), DeployError> {
    if is_privileged() {
        Ok(())
    } else {
        Err(DeployError::NotPrivileged)
    }
}

/// Whether the distribution marker file exists. Absence is only worth a warning.
pub fn is_debian(marker: &Path) -> bool {
    let found = marker.exists();
    if !found {
        warn!(marker = %marker.display(), "Distribution marker not found");
    }
    found
}

/// Fail on the first required project file that is missing.
pub fn check_required_files<S: AsRef<str>>(
    project_dir: &Path,
    files: &[S],
) -> Result<(), DeployError> {
    for file in files {
        let path = project_dir.join(file.as_ref());
        debug!(path = %path.display(), "Checking required file");
        if !path.exists() {
            return Err(DeployError::MissingFile(file.as_ref().to_string()));
        }
    }
    Ok(())
}
