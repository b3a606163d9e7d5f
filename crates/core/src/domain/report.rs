// Cleanup Report

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a cleanup run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleanupOutcome {
    /// Matching rows existed and all of them are gone
    Cleaned,
    /// Nothing matched, nothing written
    NothingToDelete,
    /// Counted only
    DryRun,
    /// Rows still match after the delete committed
    Incomplete,
}

impl std::fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanupOutcome::Cleaned => write!(f, "CLEANED"),
            CleanupOutcome::NothingToDelete => write!(f, "NOTHING_TO_DELETE"),
            CleanupOutcome::DryRun => write!(f, "DRY_RUN"),
            CleanupOutcome::Incomplete => write!(f, "INCOMPLETE"),
        }
    }
}

/// Result of a single cleanup run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub db_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub backup_bytes: Option<u64>,
    pub keyword: String,
    pub table: String,
    pub matched_before: i64,
    pub deleted: u64,
    pub remaining: i64,
    pub outcome: CleanupOutcome,
    pub finished_at: i64, // epoch ms
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        matches!(
            self.outcome,
            CleanupOutcome::Cleaned | CleanupOutcome::NothingToDelete
        )
    }
}
