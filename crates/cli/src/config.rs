//! Configuration Management
//!
//! Layered with config-rs; later sources override earlier ones:
//! 1. Built-in defaults
//! 2. User config: `<config_dir>/devtidy/config.toml`
//! 3. Local config: `./devtidy.toml`
//! 4. `--config <FILE>` (must exist)
//! 5. Environment variables: `DEVTIDY__<SECTION>__<KEY>`
//!
//! Command-line flags override all of the above.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use devtidy_core::application::fs_upload::default_platformio_command;
use devtidy_core::application::{FsUploadConfig, DEFAULT_PRODUCT};
use devtidy_core::domain::{DEFAULT_KEYWORD, DEFAULT_PROGNAME, DEFAULT_TABLE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub fs_upload: FsUploadSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Substring removed from state keys
    #[serde(default = "default_keyword")]
    pub keyword: String,

    #[serde(default = "default_table")]
    pub table: String,

    /// Editor product directory ("Code", "Code - Insiders", "VSCodium")
    #[serde(default = "default_product")]
    pub product: String,

    /// Skip OS path resolution and use this file
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsUploadSection {
    /// PlatformIO invocation; `python3 -m platformio` when unset
    pub platformio: Option<Vec<String>>,

    #[serde(default = "default_project_dir")]
    pub project_dir: String,

    #[serde(default = "default_progname")]
    pub progname: String,

    pub step_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Also write JSON logs to this file
    pub file: Option<String>,
}

fn default_keyword() -> String {
    DEFAULT_KEYWORD.to_string()
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_product() -> String {
    DEFAULT_PRODUCT.to_string()
}

fn default_project_dir() -> String {
    ".".to_string()
}

fn default_progname() -> String {
    DEFAULT_PROGNAME.to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            table: default_table(),
            product: default_product(),
            db_path: None,
        }
    }
}

impl Default for FsUploadSection {
    fn default() -> Self {
        Self {
            platformio: None,
            project_dir: default_project_dir(),
            progname: default_progname(),
            step_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // User config (XDG / Application Support / AppData)
        if let Some(path) = user_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        // Local config
        builder = builder.add_source(File::with_name("devtidy").required(false));

        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("DEVTIDY")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("fs_upload.platformio"),
        );

        let config = builder.build().context("Failed to read configuration")?;
        config
            .try_deserialize()
            .context("Invalid configuration")
    }
}

/// `<config_dir>/devtidy/config.toml`, if a home directory exists
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "devtidy").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Expand a leading `~` in user-supplied paths
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

impl FsUploadSection {
    pub fn to_service_config(&self, project_dir_override: Option<PathBuf>) -> Result<FsUploadConfig> {
        let step_timeout_ms = match self.step_timeout_secs {
            Some(secs) => Some(
                secs.checked_mul(1000)
                    .and_then(|ms| i64::try_from(ms).ok())
                    .with_context(|| {
                        format!("fs_upload.step_timeout_secs is too large: {}", secs)
                    })?,
            ),
            None => None,
        };

        Ok(FsUploadConfig {
            platformio: self
                .platformio
                .clone()
                .filter(|cmd| !cmd.is_empty())
                .unwrap_or_else(default_platformio_command),
            project_dir: project_dir_override.unwrap_or_else(|| expand_path(&self.project_dir)),
            progname: self.progname.clone(),
            step_timeout_ms,
        })
    }
}
