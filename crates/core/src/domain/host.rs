// Host Operating System

use serde::{Deserialize, Serialize};

/// Operating system the tool runs on, as far as path resolution cares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostOs {
    MacOs,
    Windows,
    Linux,
    Other(String),
}

impl HostOs {
    /// Map an OS name (`std::env::consts::OS` or a kernel name like "Darwin")
    pub fn from_os_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "macos" | "darwin" => HostOs::MacOs,
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            _ => HostOs::Other(name.to_string()),
        }
    }

    /// Suffix used in backup file names (`state.vscdb.<suffix>.backup`)
    ///
    /// Kernel-style lowercase names: `darwin`, not `macos`.
    pub fn backup_suffix(&self) -> String {
        match self {
            HostOs::MacOs => "darwin".to_string(),
            HostOs::Windows => "windows".to_string(),
            HostOs::Linux => "linux".to_string(),
            HostOs::Other(name) => name.to_lowercase(),
        }
    }
}

impl std::fmt::Display for HostOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostOs::MacOs => write!(f, "macOS"),
            HostOs::Windows => write!(f, "Windows"),
            HostOs::Linux => write!(f, "Linux"),
            HostOs::Other(name) => write!(f, "{}", name),
        }
    }
}
