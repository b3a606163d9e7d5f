//! Human-readable summaries

use colored::Colorize;
use devtidy_core::domain::{CleanupOutcome, CleanupReport, FsUploadReport};
use devtidy_core::error::AppError;
use std::io::Write;
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: String,
    #[tabled(rename = "Exit")]
    exit_code: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

pub fn cleanup_table(report: &CleanupReport) -> String {
    let backup = report
        .backup_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    let rows = vec![
        FieldRow {
            field: "Database",
            value: report.db_path.display().to_string(),
        },
        FieldRow {
            field: "Backup",
            value: backup,
        },
        FieldRow {
            field: "Table",
            value: report.table.clone(),
        },
        FieldRow {
            field: "Keyword",
            value: report.keyword.clone(),
        },
        FieldRow {
            field: "Matched",
            value: report.matched_before.to_string(),
        },
        FieldRow {
            field: "Deleted",
            value: report.deleted.to_string(),
        },
        FieldRow {
            field: "Remaining",
            value: report.remaining.to_string(),
        },
    ];

    Table::new(rows).to_string()
}

pub fn print_cleanup(report: &CleanupReport) {
    let headline = match report.outcome {
        CleanupOutcome::Cleaned => format!(
            "✓ Removed {} entries containing '{}'",
            report.deleted, report.keyword
        )
        .green()
        .bold(),
        CleanupOutcome::NothingToDelete => {
            format!("✓ No entries contain '{}'", report.keyword).green().bold()
        }
        CleanupOutcome::DryRun => format!(
            "○ Dry run: {} entries contain '{}'",
            report.matched_before, report.keyword
        )
        .yellow()
        .bold(),
        CleanupOutcome::Incomplete => format!(
            "✗ {} matching entries remain after delete, check the database",
            report.remaining
        )
        .red()
        .bold(),
    };

    println!("{}", headline);
    println!();
    println!("{}", cleanup_table(report));
}

/// Follow-up lines for a failed cleanup
///
/// `backup` is the copy taken before the store was opened, if any.
pub fn cleanup_failure_hints(err: &AppError, backup: Option<&Path>) -> Vec<String> {
    match (err, backup) {
        (AppError::NotFound(_), _) => {
            vec!["Make sure the editor is installed or pass --db-path.".to_string()]
        }
        (AppError::Backup { .. }, _) => vec!["No changes were made to the database.".to_string()],
        (AppError::Database(_), Some(backup)) => {
            vec![format!("Backup taken before the error: {}", backup.display())]
        }
        _ => Vec::new(),
    }
}

/// Error line plus hints; stderr when stdout carries JSON
pub fn print_cleanup_failure(err: &AppError, hints: &[String], json: bool) {
    let result = if json {
        write_failure(&mut std::io::stderr().lock(), err, hints)
    } else {
        write_failure(&mut std::io::stdout().lock(), err, hints)
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "Could not print failure details");
    }
}

fn write_failure(out: &mut impl Write, err: &AppError, hints: &[String]) -> std::io::Result<()> {
    writeln!(out, "  {} {}", "✗".red(), err)?;
    for hint in hints {
        writeln!(out, "  {}", hint)?;
    }
    Ok(())
}

pub fn fs_upload_table(report: &FsUploadReport) -> String {
    let rows: Vec<StepRow> = report
        .steps
        .iter()
        .map(|s| StepRow {
            step: s.step.to_string(),
            exit_code: s
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            duration: format!("{:.1}s", s.duration_ms as f64 / 1000.0),
        })
        .collect();

    Table::new(rows).to_string()
}

pub fn print_fs_upload(report: &FsUploadReport) {
    println!(
        "{}",
        format!("✓ Filesystem image uploaded for '{}'", report.environment)
            .green()
            .bold()
    );
    println!();
    println!("{}", fs_upload_table(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use devtidy_core::domain::{FsStep, PioEnvironment, StepOutcome};
    use std::path::PathBuf;

    fn report() -> CleanupReport {
        CleanupReport {
            db_path: PathBuf::from("/tmp/state.vscdb"),
            backup_path: Some(PathBuf::from("/tmp/state.vscdb.linux.backup")),
            backup_bytes: Some(4096),
            keyword: "augment".to_string(),
            table: "ItemTable".to_string(),
            matched_before: 7,
            deleted: 7,
            remaining: 0,
            outcome: CleanupOutcome::Cleaned,
            finished_at: 0,
        }
    }

    #[test]
    fn test_cleanup_table_lists_counts() {
        let table = cleanup_table(&report());
        assert!(table.contains("/tmp/state.vscdb.linux.backup"));
        assert!(table.contains("Deleted"));
        assert!(table.contains("augment"));
    }

    #[test]
    fn test_failure_hints() {
        let backup = PathBuf::from("/tmp/state.vscdb.linux.backup");

        let hints = cleanup_failure_hints(
            &AppError::NotFound(PathBuf::from("/tmp/state.vscdb")),
            None,
        );
        assert!(hints[0].contains("--db-path"));

        let hints = cleanup_failure_hints(
            &AppError::Database("no such table: ItemTable".to_string()),
            Some(&backup),
        );
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("/tmp/state.vscdb.linux.backup"));
        assert!(!hints[0].contains("not have been saved"));

        // dry run: no backup to point at
        let hints = cleanup_failure_hints(&AppError::Database("locked".to_string()), None);
        assert!(hints.is_empty());
    }

    #[test]
    fn test_write_failure_lines() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        let hints = vec!["No changes were made to the database.".to_string()];
        write_failure(&mut buf, &AppError::Config("bad".to_string()), &hints).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "  ✗ Configuration error: bad\n  No changes were made to the database.\n"
        );
    }

    #[test]
    fn test_fs_upload_table() {
        let report = FsUploadReport {
            environment: PioEnvironment::new("esp32dev").unwrap(),
            artifact: PathBuf::from(".pio/build/esp32dev/firmware.elf"),
            steps: vec![
                StepOutcome {
                    step: FsStep::BuildFs,
                    exit_code: Some(0),
                    duration_ms: 1500,
                },
                StepOutcome {
                    step: FsStep::UploadFs,
                    exit_code: Some(0),
                    duration_ms: 12000,
                },
            ],
        };

        let table = fs_upload_table(&report);
        assert!(table.contains("buildfs"));
        assert!(table.contains("uploadfs"));
        assert!(table.contains("12.0s"));
    }
}
