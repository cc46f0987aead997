//! External process execution.
//!
//! Every external invocation (`gcloud`, `poetry`, the tokenizer) is first built as
//! a [`CommandSpec`] value and then handed to a [`ProcessRunner`]. Commands can be
//! asserted on in tests by substituting the runner.

use crate::error::BootstrapError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; inherits the current directory when `None`
    pub cwd: Option<PathBuf>,
    /// Text written to the child's stdin
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// True when either stream reports the resource already exists.
    pub fn reports_already_exists(&self) -> bool {
        self.stdout.to_lowercase().contains("already exists")
            || self.stderr.to_lowercase().contains("already exists")
    }

    /// Convert a non-zero exit into an `ExternalToolFailure`.
    pub fn into_result(self, program: &str) -> Result<ProcessOutput, BootstrapError> {
        if self.success() {
            Ok(self)
        } else {
            Err(BootstrapError::ExternalToolFailure {
                program: program.to_string(),
                exit_code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Executes external commands.
pub trait ProcessRunner: Send + Sync {
    /// Whether `program` resolves to an executable on PATH.
    fn is_available(&self, program: &str) -> bool;

    /// Run to completion, capturing stdout and stderr.
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, BootstrapError>;

    /// Run with inherited stdio (long-running, user-facing processes). Returns the exit code.
    fn run_attached(&self, spec: &CommandSpec) -> Result<i32, BootstrapError>;
}

/// Runner spawning real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn runtime() -> Result<tokio::runtime::Runtime, BootstrapError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BootstrapError::Io)
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        command
    }

    async fn capture(&self, spec: &CommandSpec) -> Result<ProcessOutput, BootstrapError> {
        let mut command = Self::command(spec);
        command
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|e| spawn_error(&spec.program, e))?;
        let stdin = child.stdin.take();
        let input = spec.stdin.as_deref().unwrap_or_default().as_bytes();
        // Stdin is fed while stdout drains, or a chatty child deadlocks on a full pipe.
        let feed = async move {
            let Some(mut pipe) = stdin else {
                return Ok(());
            };
            match pipe.write_all(input).await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let exchange = async {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            let output = output?;
            fed?;
            Ok::<_, BootstrapError>(output)
        };

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| BootstrapError::Timeout {
                    program: spec.program.clone(),
                    seconds: limit.as_secs(),
                })??,
            None => exchange.await?,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput, BootstrapError> {
        debug!(command = %spec, "Executing captured command");
        let output = Self::runtime()?.block_on(self.capture(spec))?;
        debug!(command = %spec, exit_code = output.exit_code, "Command finished");
        Ok(output)
    }

    fn run_attached(&self, spec: &CommandSpec) -> Result<i32, BootstrapError> {
        info!(command = %spec, "Executing attached command");
        let mut command = Self::command(spec);
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let status = Self::runtime()?.block_on(async {
            let mut child = command.spawn().map_err(|e| spawn_error(&spec.program, e))?;
            child.wait().await.map_err(BootstrapError::Io)
        })?;
        Ok(status.code().unwrap_or(-1))
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> BootstrapError {
    if err.kind() == std::io::ErrorKind::NotFound {
        BootstrapError::tool_not_found(program)
    } else {
        BootstrapError::Io(err)
    }
}

/// Fail with `ExternalToolNotFound` unless `program` is available.
pub fn require(runner: &dyn ProcessRunner, program: &str) -> Result<(), BootstrapError> {
    if runner.is_available(program) {
        Ok(())
    } else {
        Err(BootstrapError::tool_not_found(program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_display_and_argv() {
        let spec = CommandSpec::new("gcloud")
            .args(["services", "enable"])
            .arg("--project=demo");
        assert_eq!(spec.to_string(), "gcloud services enable --project=demo");
        assert_eq!(spec.argv()[0], "gcloud");
        assert_eq!(spec.argv().len(), 4);
    }

    #[test]
    fn test_already_exists_detection_is_case_insensitive() {
        let output = ProcessOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "ERROR: Binding ALREADY EXISTS".to_string(),
        };
        assert!(output.reports_already_exists());
        assert!(!ProcessOutput::default().reports_already_exists());
    }

    #[test]
    fn test_into_result_wraps_failure() {
        let output = ProcessOutput {
            exit_code: 2,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        match output.into_result("gcloud") {
            Err(BootstrapError::ExternalToolFailure {
                program, exit_code, ..
            }) => {
                assert_eq!(program, "gcloud");
                assert_eq!(exit_code, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_program_not_on_path() {
        let runner = SystemRunner::default();
        assert!(!runner.is_available("definitely-not-a-real-binary-4821"));
        let err = require(&runner, "definitely-not-a-real-binary-4821").unwrap_err();
        assert!(matches!(err, BootstrapError::ExternalToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output_and_stdin() {
        let runner = SystemRunner::new(Some(Duration::from_secs(10)));
        let output = runner
            .run(&CommandSpec::new("sh").args(["-c", "cat; echo err >&2; exit 3"]).stdin("hello"))
            .unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "hello");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_available() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::TempDir::new().unwrap();
        let fake = temp.path().join("gcloud");
        std::fs::write(&fake, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o644)).unwrap();
        let runner = SystemRunner::default();
        assert!(!runner.is_available(fake.to_str().unwrap()));

        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(runner.is_available(fake.to_str().unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_stdin_does_not_block_on_full_stdout_pipe() {
        let runner = SystemRunner::new(Some(Duration::from_secs(30)));
        let input = "a".repeat(1 << 20);
        let output = runner.run(&CommandSpec::new("cat").stdin(input.clone())).unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.len(), input.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_times_out() {
        let runner = SystemRunner::new(Some(Duration::from_millis(100)));
        let err = runner
            .run(&CommandSpec::new("sh").args(["-c", "sleep 5"]))
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Timeout { .. }));
    }
}
