// Subprocess runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use devtidy_core::port::command_runner::{
    CommandRunner, CommandSpec, ExecutionError, ExecutionResult, ExecutionStatus,
};
use devtidy_core::port::TimeProvider;

/// Subprocess runner
/// Spawns child processes with the parent's environment; children are
/// killed if the runner gives up on them.
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Build the tokio command for a spec
    fn build_command(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).kill_on_drop(true);

        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        if spec.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }

        command
    }

    /// Await a process future, honouring the optional timeout
    async fn wait_bounded<T>(
        fut: impl Future<Output = std::io::Result<T>>,
        timeout_ms: Option<i64>,
    ) -> Result<T, ExecutionError> {
        match timeout_ms {
            Some(timeout_ms_val) => {
                match timeout(Duration::from_millis(timeout_ms_val.max(0) as u64), fut).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(ExecutionError::IoError(e.to_string())),
                    Err(_) => Err(ExecutionError::Timeout(timeout_ms_val)),
                }
            }
            None => fut
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string())),
        }
    }

    /// Spawn child process and wait for it
    async fn spawn_and_wait(
        &self,
        spec: &CommandSpec,
    ) -> Result<(ExitStatus, Option<String>, Option<String>), ExecutionError> {
        let mut child = Self::build_command(spec)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", spec.program, e)))?;

        if spec.capture_output {
            let output = Self::wait_bounded(child.wait_with_output(), spec.timeout_ms).await?;
            Ok((
                output.status,
                Some(String::from_utf8_lossy(&output.stdout).to_string()),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ))
        } else {
            let status = Self::wait_bounded(child.wait(), spec.timeout_ms).await?;
            Ok((status, None, None))
        }
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, ExecutionError> {
        let start_time = self.time_provider.now_millis();

        info!(
            command = %spec.display(),
            working_dir = ?spec.working_dir,
            timeout_ms = ?spec.timeout_ms,
            "Starting subprocess"
        );

        let (status, stdout, stderr) = self.spawn_and_wait(spec).await?;
        let duration_ms = self.time_provider.elapsed_since(start_time);

        let result = ExecutionResult {
            status: if status.success() {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::Failed
            },
            duration_ms,
            exit_code: status.code(),
            stdout,
            stderr,
        };

        info!(
            command = %spec.program,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            status = ?result.status,
            "Subprocess finished"
        );

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use devtidy_core::port::time_provider::SystemTimeProvider;

    fn runner() -> SubprocessRunner {
        SubprocessRunner::new(Arc::new(SystemTimeProvider))
    }

    #[tokio::test]
    async fn test_run_success_captured() {
        let spec = CommandSpec::new("echo").args(["hello"]).capture_output(true);

        let result = runner().run(&spec).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.unwrap_or_default().contains("hello"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failed_status() {
        let spec = CommandSpec::new("sh").args(["-c", "exit 3"]);

        let result = runner().run(&spec).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stdout.is_none());
    }

    #[tokio::test]
    async fn test_timeout() {
        let spec = CommandSpec::new("sleep").args(["10"]).timeout_ms(Some(100));

        let result = runner().run(&spec).await;

        assert!(matches!(result, Err(ExecutionError::Timeout(100))));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let spec = CommandSpec::new("devtidy-no-such-program-xyz");

        let result = runner().run(&spec).await;

        assert!(matches!(result, Err(ExecutionError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("pwd")
            .working_dir(dir.path())
            .capture_output(true);

        let result = runner().run(&spec).await.unwrap();

        let expected = dir.path().canonicalize().unwrap();
        let printed = std::path::PathBuf::from(result.stdout.unwrap().trim());
        assert_eq!(printed.canonicalize().unwrap(), expected);
    }
}
