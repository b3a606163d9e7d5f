// Filesystem Image Use Case
// Post-build action for PlatformIO projects: once the firmware .elf exists,
// build the filesystem image and upload it for the same environment.

use crate::domain::{FsStep, FsUploadReport, PioEnvironment, StepOutcome, DEFAULT_PROGNAME};
use crate::error::{AppError, Result};
use crate::port::{CommandRunner, CommandSpec, ExecutionStatus, FileSystem};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// PlatformIO invocation and project layout
#[derive(Debug, Clone)]
pub struct FsUploadConfig {
    /// Program and leading arguments, e.g. `python3 -m platformio`
    pub platformio: Vec<String>,
    pub project_dir: PathBuf,
    /// `PROGNAME` of the firmware artifact
    pub progname: String,
    pub step_timeout_ms: Option<i64>,
}

impl Default for FsUploadConfig {
    fn default() -> Self {
        Self {
            platformio: default_platformio_command(),
            project_dir: PathBuf::from("."),
            progname: DEFAULT_PROGNAME.to_string(),
            step_timeout_ms: None,
        }
    }
}

/// `python -m platformio` with the interpreter name the platform ships
pub fn default_platformio_command() -> Vec<String> {
    let python = if cfg!(windows) { "python" } else { "python3" };
    vec![
        python.to_string(),
        "-m".to_string(),
        "platformio".to_string(),
    ]
}

/// Filesystem build + upload service
pub struct FsUploadService {
    runner: Arc<dyn CommandRunner>,
    file_system: Arc<dyn FileSystem>,
    config: FsUploadConfig,
}

impl FsUploadService {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        file_system: Arc<dyn FileSystem>,
        config: FsUploadConfig,
    ) -> Self {
        Self {
            runner,
            file_system,
            config,
        }
    }

    /// `$BUILD_DIR/${PROGNAME}.elf` for an environment
    pub fn artifact_path(&self, env: &PioEnvironment) -> PathBuf {
        self.config
            .project_dir
            .join(".pio")
            .join("build")
            .join(env.as_str())
            .join(format!("{}.elf", self.config.progname))
    }

    /// Post-build action: run `buildfs` then `uploadfs`
    ///
    /// # Errors
    /// - AppError::NotFound if the firmware artifact has not been built
    /// - AppError::StepFailed if a step exits non-zero (`uploadfs` is
    ///   skipped when `buildfs` fails)
    /// - AppError::Execution if a step cannot be spawned or times out
    pub async fn on_firmware_built(&self, env: &PioEnvironment) -> Result<FsUploadReport> {
        let artifact = self.artifact_path(env);
        if !self.file_system.exists(&artifact).await {
            error!(artifact = %artifact.display(), "Firmware artifact missing, nothing to do");
            return Err(AppError::NotFound(artifact));
        }

        info!(
            environment = %env,
            artifact = %artifact.display(),
            "Firmware built, running filesystem post-build action"
        );

        let mut steps = Vec::with_capacity(2);
        for step in [FsStep::BuildFs, FsStep::UploadFs] {
            steps.push(self.run_step(step, env).await?);
        }

        Ok(FsUploadReport {
            environment: env.clone(),
            artifact,
            steps,
        })
    }

    /// Build the firmware, then fire the post-build action
    pub async fn build_then_upload(&self, env: &PioEnvironment) -> Result<FsUploadReport> {
        let firmware = self.run_step(FsStep::Firmware, env).await?;
        let mut report = self.on_firmware_built(env).await?;
        report.steps.insert(0, firmware);
        Ok(report)
    }

    /// Command line for one step
    pub fn command_for(&self, step: FsStep, env: &PioEnvironment) -> Result<CommandSpec> {
        let (program, prefix) = self
            .config
            .platformio
            .split_first()
            .ok_or_else(|| AppError::Config("PlatformIO command is empty".to_string()))?;

        Ok(CommandSpec::new(program.clone())
            .args(prefix.iter().cloned())
            .args(step.run_args(env))
            .working_dir(self.config.project_dir.clone())
            .timeout_ms(self.config.step_timeout_ms))
    }

    async fn run_step(&self, step: FsStep, env: &PioEnvironment) -> Result<StepOutcome> {
        let spec = self.command_for(step, env)?;
        info!(step = %step, command = %spec.display(), "Running PlatformIO step");

        let result = self.runner.run(&spec).await?;

        if result.status != ExecutionStatus::Success {
            error!(
                step = %step,
                exit_code = ?result.exit_code,
                "PlatformIO step failed"
            );
            return Err(AppError::StepFailed {
                target: step.to_string(),
                exit_code: result.exit_code,
            });
        }

        info!(step = %step, duration_ms = result.duration_ms, "PlatformIO step completed");

        Ok(StepOutcome {
            step,
            exit_code: result.exit_code,
            duration_ms: result.duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_runner::mocks::{MockBehavior, MockCommandRunner};
    use crate::port::file_system::mocks::MockFileSystem;
    use crate::port::ExecutionError;

    fn config() -> FsUploadConfig {
        FsUploadConfig {
            platformio: vec!["pio".to_string()],
            project_dir: PathBuf::from("/work/lamp"),
            ..Default::default()
        }
    }

    fn env() -> PioEnvironment {
        PioEnvironment::new("esp32dev").unwrap()
    }

    const ARTIFACT: &str = "/work/lamp/.pio/build/esp32dev/firmware.elf";

    #[test]
    fn test_artifact_path() {
        let svc = FsUploadService::new(
            Arc::new(MockCommandRunner::new_success()),
            Arc::new(MockFileSystem::new()),
            config(),
        );
        assert_eq!(svc.artifact_path(&env()), PathBuf::from(ARTIFACT));
    }

    #[test]
    fn test_default_command_prefix() {
        let svc = FsUploadService::new(
            Arc::new(MockCommandRunner::new_success()),
            Arc::new(MockFileSystem::new()),
            FsUploadConfig::default(),
        );
        let spec = svc.command_for(FsStep::BuildFs, &env()).unwrap();
        assert!(spec.program.starts_with("python"));
        assert_eq!(
            spec.args,
            vec!["-m", "platformio", "run", "--target", "buildfs", "--environment", "esp32dev"]
        );
    }

    #[test]
    fn test_empty_command_rejected() {
        let svc = FsUploadService::new(
            Arc::new(MockCommandRunner::new_success()),
            Arc::new(MockFileSystem::new()),
            FsUploadConfig {
                platformio: vec![],
                ..Default::default()
            },
        );
        assert!(matches!(
            svc.command_for(FsStep::BuildFs, &env()),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_runs_buildfs_then_uploadfs() {
        let runner = MockCommandRunner::new_success();
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            config(),
        );

        let report = svc.on_firmware_built(&env()).await.unwrap();

        let steps: Vec<FsStep> = report.steps.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![FsStep::BuildFs, FsStep::UploadFs]);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].display(), "pio run --target buildfs --environment esp32dev");
        assert_eq!(calls[1].display(), "pio run --target uploadfs --environment esp32dev");
        assert_eq!(calls[0].working_dir, Some(PathBuf::from("/work/lamp")));
    }

    #[tokio::test]
    async fn test_missing_artifact_runs_nothing() {
        let runner = MockCommandRunner::new_success();
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new()),
            config(),
        );

        let err = svc.on_firmware_built(&env()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_buildfs_failure_skips_upload() {
        let runner = MockCommandRunner::scripted([MockBehavior::ExitCode(1)]);
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            config(),
        );

        let err = svc.on_firmware_built(&env()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::StepFailed { ref target, exit_code: Some(1) } if target == "buildfs"
        ));
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_execution_error() {
        let runner = MockCommandRunner::scripted([MockBehavior::Fail("no python".to_string())]);
        let svc = FsUploadService::new(
            Arc::new(runner),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            config(),
        );

        let err = svc.on_firmware_built(&env()).await.unwrap_err();
        assert!(matches!(err, AppError::Execution(_)));
    }

    #[tokio::test]
    async fn test_buildfs_timeout_skips_upload() {
        let runner = MockCommandRunner::scripted([MockBehavior::Timeout(30_000)]);
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            FsUploadConfig {
                step_timeout_ms: Some(30_000),
                ..config()
            },
        );

        let err = svc.on_firmware_built(&env()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Execution(ExecutionError::Timeout(30_000))
        ));
        assert_eq!(runner.call_count(), 1);
        assert_eq!(runner.calls()[0].args[2], "buildfs");
        assert_eq!(runner.calls()[0].timeout_ms, Some(30_000));
    }

    #[tokio::test]
    async fn test_build_then_upload() {
        let runner = MockCommandRunner::new_success();
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            config(),
        );

        let report = svc.build_then_upload(&env()).await.unwrap();

        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[0].step, FsStep::Firmware);
        assert_eq!(runner.calls()[0].display(), "pio run --environment esp32dev");
    }

    #[tokio::test]
    async fn test_failed_firmware_build_skips_hook() {
        let runner = MockCommandRunner::scripted([MockBehavior::ExitCode(2)]);
        let svc = FsUploadService::new(
            Arc::new(runner.clone()),
            Arc::new(MockFileSystem::new().with_file(ARTIFACT)),
            config(),
        );

        let err = svc.build_then_upload(&env()).await.unwrap_err();

        assert!(matches!(err, AppError::StepFailed { ref target, .. } if target == "build"));
        assert_eq!(runner.call_count(), 1);
    }
}
