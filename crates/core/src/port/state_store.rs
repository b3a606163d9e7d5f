// State Store Port
// The editor's key/value table: count and delete rows by key pattern.

use crate::domain::{KeyPattern, TableName};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Open connection to a key/value table
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Count rows whose key contains the pattern's keyword
    async fn count_matching(&self, pattern: &KeyPattern) -> Result<i64>;

    /// Delete rows whose key contains the pattern's keyword (one transaction)
    ///
    /// # Returns
    /// Number of rows deleted
    async fn delete_matching(&self, pattern: &KeyPattern) -> Result<u64>;

    /// Release the underlying connection
    async fn close(&self);
}

/// Opens a `StateStore` on an existing database file
#[async_trait]
pub trait StateStoreOpener: Send + Sync {
    /// # Errors
    /// - AppError::Database if the file cannot be opened as a database
    ///   or the table does not exist
    async fn open(&self, path: &Path, table: &TableName) -> Result<Box<dyn StateStore>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Shared {
        keys: Vec<String>,
        open_count: usize,
        closed: bool,
        ignore_deletes: bool,
        fail_open: bool,
    }

    /// Opener handing out stores that share one in-memory key list
    #[derive(Clone, Default)]
    pub struct MockStateStoreOpener {
        shared: Arc<Mutex<Shared>>,
    }

    impl MockStateStoreOpener {
        pub fn with_keys<I, S>(keys: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let opener = Self::default();
            opener.shared.lock().unwrap().keys = keys.into_iter().map(Into::into).collect();
            opener
        }

        /// Deletes report zero rows and leave the table untouched
        pub fn ignoring_deletes(self) -> Self {
            self.shared.lock().unwrap().ignore_deletes = true;
            self
        }

        pub fn failing_open(self) -> Self {
            self.shared.lock().unwrap().fail_open = true;
            self
        }

        pub fn open_count(&self) -> usize {
            self.shared.lock().unwrap().open_count
        }

        pub fn was_closed(&self) -> bool {
            self.shared.lock().unwrap().closed
        }

        pub fn keys(&self) -> Vec<String> {
            self.shared.lock().unwrap().keys.clone()
        }
    }

    #[async_trait]
    impl StateStoreOpener for MockStateStoreOpener {
        async fn open(&self, _path: &Path, _table: &TableName) -> Result<Box<dyn StateStore>> {
            let mut shared = self.shared.lock().unwrap();
            shared.open_count += 1;
            if shared.fail_open {
                return Err(AppError::Database("mock open failure".to_string()));
            }
            Ok(Box::new(MockStateStore {
                shared: self.shared.clone(),
            }))
        }
    }

    struct MockStateStore {
        shared: Arc<Mutex<Shared>>,
    }

    #[async_trait]
    impl StateStore for MockStateStore {
        async fn count_matching(&self, pattern: &KeyPattern) -> Result<i64> {
            let shared = self.shared.lock().unwrap();
            Ok(shared.keys.iter().filter(|k| pattern.matches(k)).count() as i64)
        }

        async fn delete_matching(&self, pattern: &KeyPattern) -> Result<u64> {
            let mut shared = self.shared.lock().unwrap();
            if shared.ignore_deletes {
                return Ok(0);
            }
            let before = shared.keys.len();
            shared.keys.retain(|k| !pattern.matches(k));
            Ok((before - shared.keys.len()) as u64)
        }

        async fn close(&self) {
            self.shared.lock().unwrap().closed = true;
        }
    }
}
