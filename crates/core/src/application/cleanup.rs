// Cleanup Use Case
// Back up the editor's state database, then purge keys containing a keyword.

use crate::application::locate::{backup_path_for, resolve_state_db_path, DEFAULT_PRODUCT};
use crate::domain::{CleanupOutcome, CleanupReport, KeyPattern, TableName};
use crate::error::{AppError, Result};
use crate::port::{FileSystem, PlatformProbe, StateStore, StateStoreOpener, TimeProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Cleanup request
#[derive(Debug, Clone)]
pub struct CleanupRequest {
    /// Explicit database path; resolved per OS when `None`
    pub db_path: Option<PathBuf>,
    pub pattern: KeyPattern,
    pub table: TableName,
    /// Editor product directory used for path resolution
    pub product: String,
    /// Count only: no backup, no delete
    pub dry_run: bool,
}

impl Default for CleanupRequest {
    fn default() -> Self {
        Self {
            db_path: None,
            pattern: KeyPattern::default(),
            table: TableName::default(),
            product: DEFAULT_PRODUCT.to_string(),
            dry_run: false,
        }
    }
}

/// Row counts gathered while the store is open
struct PurgeCounts {
    matched_before: i64,
    deleted: u64,
    remaining: i64,
    outcome: CleanupOutcome,
}

/// State database cleanup service
pub struct CleanupService {
    platform: Arc<dyn PlatformProbe>,
    file_system: Arc<dyn FileSystem>,
    opener: Arc<dyn StateStoreOpener>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CleanupService {
    pub fn new(
        platform: Arc<dyn PlatformProbe>,
        file_system: Arc<dyn FileSystem>,
        opener: Arc<dyn StateStoreOpener>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            platform,
            file_system,
            opener,
            time_provider,
        }
    }

    /// Database path the request refers to
    pub fn resolve_db_path(&self, req: &CleanupRequest) -> Result<PathBuf> {
        match &req.db_path {
            Some(path) => Ok(path.clone()),
            None => resolve_state_db_path(self.platform.as_ref(), &req.product),
        }
    }

    /// Where the backup of `db_path` goes on this platform
    pub fn backup_path(&self, db_path: &std::path::Path) -> PathBuf {
        backup_path_for(db_path, &self.platform.os())
    }

    /// Run the cleanup
    ///
    /// Order is fixed: existence check, backup, open, count, delete, recount.
    /// Nothing is written unless the backup succeeded.
    ///
    /// # Errors
    /// - AppError::NotFound if the database file does not exist
    /// - AppError::Backup if the backup copy fails (database untouched)
    /// - AppError::Database on any store error after the backup
    pub async fn run(&self, req: CleanupRequest) -> Result<CleanupReport> {
        let db_path = self.resolve_db_path(&req)?;

        info!(
            db_path = %db_path.display(),
            keyword = %req.pattern,
            table = %req.table,
            dry_run = req.dry_run,
            "Starting state database cleanup"
        );

        if !self.file_system.exists(&db_path).await {
            warn!(db_path = %db_path.display(), "Database file not found, aborting");
            return Err(AppError::NotFound(db_path));
        }

        let (backup_path, backup_bytes) = if req.dry_run {
            (None, None)
        } else {
            let backup_path = self.backup_path(&db_path);
            info!(backup_path = %backup_path.display(), "Backing up database");

            let bytes = self
                .file_system
                .backup(&db_path, &backup_path)
                .await
                .map_err(|source| AppError::Backup {
                    path: backup_path.clone(),
                    source,
                })?;

            info!(backup_path = %backup_path.display(), bytes = bytes, "Backup written");
            (Some(backup_path), Some(bytes))
        };

        let store = self.opener.open(&db_path, &req.table).await?;
        let counts = self.purge(store.as_ref(), &req).await;
        store.close().await;
        let counts = counts?;

        info!(
            matched_before = counts.matched_before,
            deleted = counts.deleted,
            remaining = counts.remaining,
            outcome = %counts.outcome,
            "State database cleanup finished"
        );

        Ok(CleanupReport {
            db_path,
            backup_path,
            backup_bytes,
            keyword: req.pattern.keyword().to_string(),
            table: req.table.as_str().to_string(),
            matched_before: counts.matched_before,
            deleted: counts.deleted,
            remaining: counts.remaining,
            outcome: counts.outcome,
            finished_at: self.time_provider.now_millis(),
        })
    }

    async fn purge(&self, store: &dyn StateStore, req: &CleanupRequest) -> Result<PurgeCounts> {
        let matched_before = store.count_matching(&req.pattern).await?;
        info!(matched = matched_before, keyword = %req.pattern, "Counted matching rows");

        if req.dry_run || matched_before == 0 {
            let outcome = if req.dry_run {
                CleanupOutcome::DryRun
            } else {
                CleanupOutcome::NothingToDelete
            };
            return Ok(PurgeCounts {
                matched_before,
                deleted: 0,
                remaining: matched_before,
                outcome,
            });
        }

        let deleted = store.delete_matching(&req.pattern).await?;
        let remaining = store.count_matching(&req.pattern).await?;

        let outcome = if remaining == 0 {
            CleanupOutcome::Cleaned
        } else {
            warn!(
                remaining = remaining,
                deleted = deleted,
                "Matching rows remain after delete, check the database"
            );
            CleanupOutcome::Incomplete
        };

        Ok(PurgeCounts {
            matched_before,
            deleted,
            remaining,
            outcome,
        })
    }
}
