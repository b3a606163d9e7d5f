// Platform Probe Port
// OS name, environment variables and home directory, behind a trait so that
// path resolution can be tested for every OS on any OS.

use crate::domain::HostOs;
use std::path::PathBuf;

/// Read-only view of the host platform
pub trait PlatformProbe: Send + Sync {
    /// Operating system the process runs on
    fn os(&self) -> HostOs;

    /// Value of an environment variable, if set and valid unicode
    fn env_var(&self, name: &str) -> Option<String>;

    /// Current user's home directory
    fn home_dir(&self) -> Option<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Fixed platform description
    #[derive(Debug, Clone)]
    pub struct MockPlatform {
        os: HostOs,
        env: HashMap<String, String>,
        home: Option<PathBuf>,
    }

    impl MockPlatform {
        pub fn new(os: HostOs) -> Self {
            Self {
                os,
                env: HashMap::new(),
                home: None,
            }
        }

        pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
            self.home = Some(home.into());
            self
        }

        pub fn with_env(mut self, name: &str, value: &str) -> Self {
            self.env.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl PlatformProbe for MockPlatform {
        fn os(&self) -> HostOs {
            self.os.clone()
        }

        fn env_var(&self, name: &str) -> Option<String> {
            self.env.get(name).cloned()
        }

        fn home_dir(&self) -> Option<PathBuf> {
            self.home.clone()
        }
    }
}
