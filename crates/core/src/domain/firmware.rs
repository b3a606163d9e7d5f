// PlatformIO filesystem-image domain model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default `PROGNAME` of a PlatformIO build
pub const DEFAULT_PROGNAME: &str = "firmware";

/// PlatformIO environment name (`[env:<name>]` in platformio.ini)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PioEnvironment(String);

impl PioEnvironment {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidEnvironment(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PioEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PlatformIO run targets driven by this tool, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FsStep {
    /// Main firmware build (no `--target`)
    Firmware,
    BuildFs,
    UploadFs,
}

impl FsStep {
    /// Value passed to `--target`, if any
    pub fn target(&self) -> Option<&'static str> {
        match self {
            FsStep::Firmware => None,
            FsStep::BuildFs => Some("buildfs"),
            FsStep::UploadFs => Some("uploadfs"),
        }
    }

    /// Arguments appended after the PlatformIO invocation prefix
    pub fn run_args(&self, env: &PioEnvironment) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        if let Some(target) = self.target() {
            args.push("--target".to_string());
            args.push(target.to_string());
        }
        args.push("--environment".to_string());
        args.push(env.as_str().to_string());
        args
    }
}

impl std::fmt::Display for FsStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsStep::Firmware => write!(f, "build"),
            FsStep::BuildFs => write!(f, "buildfs"),
            FsStep::UploadFs => write!(f, "uploadfs"),
        }
    }
}

/// One finished PlatformIO step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: FsStep,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

/// Result of a filesystem build + upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsUploadReport {
    pub environment: PioEnvironment,
    pub artifact: PathBuf,
    pub steps: Vec<StepOutcome>,
}
