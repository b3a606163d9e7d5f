// Platform Probe Implementation (directories + std::env)

use devtidy_core::domain::HostOs;
use devtidy_core::port::PlatformProbe;
use directories::BaseDirs;
use std::path::PathBuf;

/// The platform this process runs on
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl SystemPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformProbe for SystemPlatform {
    fn os(&self) -> HostOs {
        HostOs::from_os_name(std::env::consts::OS)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }
}
