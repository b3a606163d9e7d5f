// Command Runner Port
// Abstraction for running external build tools as child processes

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout_ms: Option<i64>,
    /// Capture stdout/stderr instead of inheriting the parent's streams
    pub capture_output: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout_ms: None,
            capture_output: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: Option<i64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Command line as typed in a shell (for logs)
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub duration_ms: i64,
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

/// Execution status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(i64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns an external process
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and return its result
    ///
    /// A non-zero exit is a successful run with `ExecutionStatus::Failed`.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the process cannot be started
    /// - ExecutionError::Timeout if execution exceeds `timeout_ms`
    async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior for one call
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0
        Success,
        /// Exit with the given code
        ExitCode(i32),
        /// Fail to spawn with message
        Fail(String),
        /// Timeout after N ms
        Timeout(i64),
    }

    /// Mock Command Runner for testing
    ///
    /// Plays back scripted behaviors in order; once the script is
    /// exhausted every call succeeds.
    #[derive(Clone, Default)]
    pub struct MockCommandRunner {
        script: Arc<Mutex<VecDeque<MockBehavior>>>,
        calls: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl MockCommandRunner {
        pub fn new_success() -> Self {
            Self::default()
        }

        pub fn scripted(behaviors: impl IntoIterator<Item = MockBehavior>) -> Self {
            Self {
                script: Arc::new(Mutex::new(behaviors.into_iter().collect())),
                calls: Arc::default(),
            }
        }

        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<ExecutionResult, ExecutionError> {
            self.calls.lock().unwrap().push(spec.clone());

            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(MockBehavior::Success);

            match behavior {
                MockBehavior::Success => Ok(ExecutionResult {
                    status: ExecutionStatus::Success,
                    duration_ms: 100,
                    exit_code: Some(0),
                    stdout: None,
                    stderr: None,
                }),
                MockBehavior::ExitCode(code) => Ok(ExecutionResult {
                    status: ExecutionStatus::Failed,
                    duration_ms: 100,
                    exit_code: Some(code),
                    stdout: None,
                    stderr: None,
                }),
                MockBehavior::Fail(msg) => Err(ExecutionError::SpawnFailed(msg)),
                MockBehavior::Timeout(ms) => Err(ExecutionError::Timeout(ms)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::new("python3")
            .args(["-m", "platformio", "run"])
            .working_dir("/tmp");
        assert_eq!(spec.display(), "python3 -m platformio run");
        assert_eq!(spec.working_dir, Some(PathBuf::from("/tmp")));
        assert!(!spec.capture_output);
    }
}
