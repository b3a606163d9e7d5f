// SQLite StateStore Implementation
use async_trait::async_trait;
use devtidy_core::domain::{KeyPattern, TableName};
use devtidy_core::error::{AppError, Result};
use devtidy_core::port::{StateStore, StateStoreOpener};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

use crate::connection::open_existing;

/// Key/value table inside an editor state database
pub struct SqliteStateStore {
    pool: SqlitePool,
    table: TableName,
    count_sql: String,
    delete_sql: String,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool, table: TableName) -> Self {
        // Table names cannot be bound; TableName guarantees a plain identifier
        let count_sql = format!(
            r#"SELECT COUNT(*) FROM "{}" WHERE key LIKE ?1 ESCAPE '\'"#,
            table.as_str()
        );
        let delete_sql = format!(
            r#"DELETE FROM "{}" WHERE key LIKE ?1 ESCAPE '\'"#,
            table.as_str()
        );

        Self {
            pool,
            table,
            count_sql,
            delete_sql,
        }
    }

    /// Fail early when the file is not an editor state database
    pub async fn verify_table(&self) -> Result<()> {
        let found: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        )
        .bind(self.table.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to read schema: {}", e)))?;

        if found == 0 {
            return Err(AppError::Database(format!(
                "Table {} not found",
                self.table
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn count_matching(&self, pattern: &KeyPattern) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&self.count_sql)
            .bind(pattern.like_pattern())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count rows: {}", e)))?;

        debug!(table = %self.table, keyword = %pattern, count = count, "Counted rows");
        Ok(count)
    }

    async fn delete_matching(&self, pattern: &KeyPattern) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query(&self.delete_sql)
            .bind(pattern.like_pattern())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Delete failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Commit failed: {}", e)))?;

        let deleted = result.rows_affected();
        info!(table = %self.table, keyword = %pattern, deleted = deleted, "Deleted rows");
        Ok(deleted)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Opens `SqliteStateStore`s on existing files
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteStateStoreOpener;

#[async_trait]
impl StateStoreOpener for SqliteStateStoreOpener {
    async fn open(&self, path: &Path, table: &TableName) -> Result<Box<dyn StateStore>> {
        let pool = open_existing(path).await?;
        let store = SqliteStateStore::new(pool, table.clone());

        if let Err(e) = store.verify_table().await {
            store.close().await;
            return Err(e);
        }

        info!(db_path = %path.display(), table = %table, "Connected to state database");
        Ok(Box::new(store))
    }
}
