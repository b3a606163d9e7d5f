// SQLite Connection Setup
// The database belongs to the editor: never create it, never change its
// journal mode, one connection only.

use devtidy_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Open an existing SQLite database file
pub async fn open_existing(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(false);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| AppError::Database(format!("Failed to open {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.vscdb");

        let result = open_existing(&path).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(!path.exists(), "must not create the database");
    }
}
