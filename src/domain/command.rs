//! Subprocess invocation.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use super::error::DeployError;

/// A single external command to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment on top of the inherited one
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
    /// Bytes fed to the child's stdin
    pub stdin: Option<Vec<u8>>,
    /// Capture stdout instead of letting it through to the terminal
    pub capture: bool,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn with_envs<'a>(mut self, envs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.envs
            .extend(envs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn with_stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    /// Command line as shown in error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for running external commands.
pub trait CommandRunner {
    /// Run a command and report how it ended. Only spawn failures are errors.
    fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, DeployError>;

    /// Run a command, turning a non-zero exit into [`DeployError::CommandFailed`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, DeployError> {
        let output = self.execute(spec)?;
        if output.success {
            Ok(output)
        } else {
            Err(DeployError::CommandFailed {
                command: spec.display(),
                stderr: output.stderr,
            })
        }
    }

    /// Whether a captured command exits successfully. Spawn failures count as `false`.
    fn probe(&self, program: &str, args: &[&str]) -> bool {
        let spec = CommandSpec::new(program, args.iter().copied()).captured();
        self.execute(&spec).map(|o| o.success).unwrap_or(false)
    }
}

/// Runs commands on the host with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, DeployError> {
        debug!(command = %spec.display(), cwd = ?spec.cwd, "Running command");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd.stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        if spec.capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::piped());
        }

        let spawn_err = |source: std::io::Error| DeployError::CommandSpawn {
            command: spec.display(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;
        if let (Some(input), Some(mut stdin)) = (&spec.stdin, child.stdin.take()) {
            stdin.write_all(input).map_err(spawn_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;

        debug!(
            command = %spec.display(),
            status = %output.status,
            "Command finished"
        );

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedRunner;
    use super::*;

    #[test]
    fn test_display_joins_program_and_args() {
        let spec = CommandSpec::new("apt-get", ["install", "-y", "curl"]);
        assert_eq!(spec.display(), "apt-get install -y curl");
    }

    #[test]
    fn test_run_maps_failure_to_error() {
        let runner = ScriptedRunner::new().respond("false", false, "");
        let err = runner.run(&CommandSpec::new("false", Vec::<String>::new())).unwrap_err();
        assert!(matches!(err, DeployError::CommandFailed { ref command, .. } if command == "false"));
    }

    #[test]
    fn test_probe_reports_status() {
        let runner = ScriptedRunner::new().respond("which docker", false, "");
        assert!(!runner.probe("which", &["docker"]));
        assert!(runner.probe("which", &["docker-compose"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let output = SystemRunner
            .execute(&CommandSpec::new("sh", ["-c", "echo hi; echo oops >&2; exit 3"]).captured())
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.stdout.trim(), "hi");
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_passes_env_cwd_and_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh", ["-c", "read line; echo \"$line $GREETING $(pwd)\""])
            .captured()
            .in_dir(dir.path())
            .with_envs([("GREETING", "hello")])
            .with_stdin(b"piped\n".to_vec());

        let output = SystemRunner.run(&spec).unwrap();
        let expected_dir = dir.path().canonicalize().unwrap();
        assert_eq!(
            output.stdout.trim(),
            format!("piped hello {}", expected_dir.display())
        );
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let err = SystemRunner
            .execute(&CommandSpec::new("definitely-not-a-real-binary-xyz", Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, DeployError::CommandSpawn { .. }));
    }
}
