//! Logging setup
//!
//! Console logs go to stderr so command output on stdout stays clean.
//! `DEVTIDY_LOG_FORMAT=json` overrides `[logging] format`; `RUST_LOG`
//! overrides the verbosity flags.

use crate::config::{expand_path, LoggingConfig};
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for `-v` count
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "devtidy=warn",
        1 => "devtidy=info",
        _ => "devtidy=debug,sqlx=info",
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the log file on drop; keep it alive for the
/// whole run.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<Option<WorkerGuard>> {
    let format = std::env::var("DEVTIDY_LOG_FORMAT").unwrap_or_else(|_| config.format.clone());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .context("Failed to create env filter")?;

    let mut guard = None;
    let file_layer = match &config.file {
        Some(raw) => {
            let path = expand_path(raw);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?
                .to_os_string();

            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let (writer, worker_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            guard = Some(worker_guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    match format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(guard)
}
