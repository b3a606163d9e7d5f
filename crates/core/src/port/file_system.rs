// File System Port (existence checks and backup copies)

use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether a regular file exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Copy `source` to `destination`, overwriting it and keeping the
    /// source's modification time
    ///
    /// # Returns
    /// Number of bytes copied
    async fn backup(&self, source: &Path, destination: &Path) -> std::io::Result<u64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// In-memory file system: a set of existing paths and a log of copies
    #[derive(Clone, Default)]
    pub struct MockFileSystem {
        existing: Arc<Mutex<HashSet<PathBuf>>>,
        backups: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
        fail_backup: bool,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
            self.existing.lock().unwrap().insert(path.into());
            self
        }

        pub fn failing_backup(mut self) -> Self {
            self.fail_backup = true;
            self
        }

        pub fn backups(&self) -> Vec<(PathBuf, PathBuf)> {
            self.backups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FileSystem for MockFileSystem {
        async fn exists(&self, path: &Path) -> bool {
            self.existing.lock().unwrap().contains(path)
        }

        async fn backup(&self, source: &Path, destination: &Path) -> std::io::Result<u64> {
            if self.fail_backup {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock backup failure",
                ));
            }
            if !self.existing.lock().unwrap().contains(source) {
                return Err(std::io::Error::from(std::io::ErrorKind::NotFound));
            }

            self.backups
                .lock()
                .unwrap()
                .push((source.to_path_buf(), destination.to_path_buf()));
            self.existing
                .lock()
                .unwrap()
                .insert(destination.to_path_buf());
            Ok(0)
        }
    }
}
