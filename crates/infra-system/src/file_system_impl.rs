// Local File System Implementation
use async_trait::async_trait;
use devtidy_core::port::FileSystem;
use std::path::Path;
use tracing::debug;

/// tokio-backed local file system
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn backup(&self, source: &Path, destination: &Path) -> std::io::Result<u64> {
        let bytes = tokio::fs::copy(source, destination).await?;

        // Keep the source mtime so the backup dates from the original data
        let modified = tokio::fs::metadata(source).await?.modified()?;
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(destination)
            .await?
            .into_std()
            .await;
        file.set_modified(modified)?;
        file.sync_all()?;

        debug!(
            source = %source.display(),
            destination = %destination.display(),
            bytes = bytes,
            "File copied"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("state.vscdb");
        std::fs::write(&file, b"data").unwrap();

        let fs = LocalFileSystem::new();
        assert!(fs.exists(&file).await);
        assert!(!fs.exists(&dir.path().join("missing")).await);
        // Directories are not database files
        assert!(!fs.exists(dir.path()).await);
    }

    #[tokio::test]
    async fn test_backup_is_identical_and_keeps_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("state.vscdb");
        let destination = dir.path().join("state.vscdb.linux.backup");
        std::fs::write(&source, b"SQLite format 3\0payload").unwrap();

        let fs = LocalFileSystem::new();
        let bytes = fs.backup(&source, &destination).await.unwrap();

        assert_eq!(bytes, 23);
        assert_eq!(
            std::fs::read(&source).unwrap(),
            std::fs::read(&destination).unwrap()
        );
        assert_eq!(
            std::fs::metadata(&source).unwrap().modified().unwrap(),
            std::fs::metadata(&destination).unwrap().modified().unwrap()
        );
    }

    #[tokio::test]
    async fn test_backup_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("state.vscdb");
        std::fs::write(&source, b"data").unwrap();

        let fs = LocalFileSystem::new();
        let result = fs
            .backup(&source, &dir.path().join("nope").join("state.backup"))
            .await;

        assert!(result.is_err());
    }
}
