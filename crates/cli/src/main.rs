//! devtidy CLI - editor state cleanup and PlatformIO filesystem upload

mod config;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{expand_path, AppConfig};
use devtidy_core::application::{CleanupRequest, CleanupService, FsUploadService};
use devtidy_core::domain::{CleanupOutcome, KeyPattern, PioEnvironment, TableName};
use devtidy_core::error::AppError;
use devtidy_core::port::time_provider::SystemTimeProvider;
use devtidy_core::port::PlatformProbe;
use devtidy_infra_sqlite::SqliteStateStoreOpener;
use devtidy_infra_system::{LocalFileSystem, SubprocessRunner, SystemPlatform};

#[derive(Parser)]
#[command(name = "devtidy")]
#[command(about = "Editor state cleanup and PlatformIO filesystem upload", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML)
    #[arg(long, global = true, env = "DEVTIDY_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up the editor state database and delete keys containing a keyword
    ///
    /// Close the editor first.
    Clean {
        /// Database file (default: resolved for this OS)
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Substring to match in the key column
        #[arg(short, long)]
        keyword: Option<String>,

        /// Key/value table name
        #[arg(long)]
        table: Option<String>,

        /// Editor product directory (e.g. "Code", "Code - Insiders", "VSCodium")
        #[arg(long)]
        product: Option<String>,

        /// Only count matching entries
        #[arg(long)]
        dry_run: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print where the state database and its backup live
    Locate {
        /// Editor product directory
        #[arg(long)]
        product: Option<String>,
    },

    /// Build and upload the filesystem image after a firmware build
    FsUpload {
        /// PlatformIO environment
        #[arg(short, long, env = "PIOENV")]
        environment: String,

        /// PlatformIO project directory
        #[arg(long)]
        project_dir: Option<PathBuf>,

        /// Build the firmware first
        #[arg(long)]
        build: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load(cli.config.as_deref())?;
    let _log_guard = logging::init(&app_config.logging, cli.verbose)?;

    info!("devtidy v{} starting...", devtidy_core::VERSION);
    debug!(config = ?app_config, "Configuration loaded");

    match cli.command {
        Commands::Clean {
            db_path,
            keyword,
            table,
            product,
            dry_run,
            json,
        } => {
            let cleanup = &app_config.cleanup;
            let req = CleanupRequest {
                db_path: db_path.or_else(|| cleanup.db_path.as_deref().map(expand_path)),
                pattern: KeyPattern::new(keyword.unwrap_or_else(|| cleanup.keyword.clone()))?,
                table: TableName::new(table.unwrap_or_else(|| cleanup.table.clone()))?,
                product: product.unwrap_or_else(|| cleanup.product.clone()),
                dry_run,
            };
            run_clean(req, json).await?;
        }

        Commands::Locate { product } => {
            let platform = SystemPlatform::new();
            let product = product.unwrap_or_else(|| app_config.cleanup.product.clone());
            let db_path =
                devtidy_core::application::resolve_state_db_path(&platform, &product)?;
            let backup = devtidy_core::application::backup_path_for(&db_path, &platform.os());

            let state = if db_path.is_file() {
                "present".green()
            } else {
                "missing".red()
            };
            println!("  {} {} ({})", "Database:".bold(), db_path.display(), state);
            println!("  {} {}", "Backup:".bold(), backup.display());
        }

        Commands::FsUpload {
            environment,
            project_dir,
            build,
        } => {
            let env = PioEnvironment::new(environment)?;
            let service_config = app_config.fs_upload.to_service_config(project_dir)?;
            let service = FsUploadService::new(
                Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider))),
                Arc::new(LocalFileSystem::new()),
                service_config,
            );

            println!(
                "{}",
                format!("Filesystem post-build action for '{}'", env).cyan().bold()
            );

            let report = if build {
                service.build_then_upload(&env).await
            } else {
                service.on_firmware_built(&env).await
            };

            match report {
                Ok(report) => output::print_fs_upload(&report),
                Err(e) => {
                    println!("  {} {}", "✗".red(), e);
                    return Err(e).context("Filesystem upload failed");
                }
            }
        }
    }

    Ok(())
}

async fn run_clean(req: CleanupRequest, json: bool) -> Result<()> {
    let service = CleanupService::new(
        Arc::new(SystemPlatform::new()),
        Arc::new(LocalFileSystem::new()),
        Arc::new(SqliteStateStoreOpener),
        Arc::new(SystemTimeProvider),
    );

    if !json {
        println!("{}", "Cleaning editor state database...".cyan().bold());
        println!();
    }

    match service.run(req.clone()).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_cleanup(&report);
            }

            if report.outcome == CleanupOutcome::Incomplete {
                anyhow::bail!("{} matching entries remain", report.remaining);
            }
            Ok(())
        }
        Err(e) => {
            let backup = match &e {
                AppError::Database(_) if !req.dry_run => service
                    .resolve_db_path(&req)
                    .ok()
                    .map(|db_path| service.backup_path(&db_path)),
                _ => None,
            };
            let hints = output::cleanup_failure_hints(&e, backup.as_deref());
            output::print_cleanup_failure(&e, &hints, json);
            Err(e).context("Cleanup aborted")
        }
    }
}
