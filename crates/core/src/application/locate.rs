// Locate Use Case
// Where the editor keeps its global state database on each OS

use crate::domain::HostOs;
use crate::error::{AppError, Result};
use crate::port::PlatformProbe;
use std::path::{Path, PathBuf};

/// Editor product directory ("Code" for the official VS Code build)
pub const DEFAULT_PRODUCT: &str = "Code";

/// Database location relative to the product directory
const STATE_DB_SEGMENTS: [&str; 3] = ["User", "globalStorage", "state.vscdb"];

/// Resolve the global state database path for the current platform
///
/// # Errors
/// - AppError::UnsupportedPlatform on anything but macOS, Windows, Linux
/// - AppError::MissingEnv if APPDATA is unset on Windows
/// - AppError::Config if no home directory can be determined
pub fn resolve_state_db_path(platform: &dyn PlatformProbe, product: &str) -> Result<PathBuf> {
    if product.trim().is_empty() {
        return Err(AppError::Validation(
            "Editor product directory must not be empty".to_string(),
        ));
    }

    let base = match platform.os() {
        HostOs::MacOs => home_dir(platform)?
            .join("Library")
            .join("Application Support"),
        HostOs::Windows => platform
            .env_var("APPDATA")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::MissingEnv("APPDATA".to_string()))?,
        HostOs::Linux => home_dir(platform)?.join(".config"),
        HostOs::Other(name) => return Err(AppError::UnsupportedPlatform(name)),
    };

    Ok(STATE_DB_SEGMENTS
        .iter()
        .fold(base.join(product), |path, segment| path.join(segment)))
}

/// Backup location: `<db_path>.<os>.backup`, next to the database
pub fn backup_path_for(db_path: &Path, os: &HostOs) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(format!(".{}.backup", os.backup_suffix()));
    PathBuf::from(name)
}

fn home_dir(platform: &dyn PlatformProbe) -> Result<PathBuf> {
    platform
        .home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::platform::mocks::MockPlatform;

    #[test]
    fn test_macos_path() {
        let platform = MockPlatform::new(HostOs::MacOs).with_home("/Users/dev");
        let path = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/Users/dev/Library/Application Support/Code/User/globalStorage/state.vscdb")
        );
    }

    #[test]
    fn test_linux_path() {
        let platform = MockPlatform::new(HostOs::Linux).with_home("/home/dev");
        let path = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/dev/.config/Code/User/globalStorage/state.vscdb")
        );
    }

    #[test]
    fn test_windows_path_uses_appdata() {
        let platform = MockPlatform::new(HostOs::Windows).with_env("APPDATA", "/appdata");
        let path = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/appdata")
                .join("Code")
                .join("User")
                .join("globalStorage")
                .join("state.vscdb")
        );
    }

    #[test]
    fn test_windows_without_appdata() {
        let platform = MockPlatform::new(HostOs::Windows).with_home("C:/Users/dev");
        let err = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap_err();
        assert!(matches!(err, AppError::MissingEnv(ref name) if name == "APPDATA"));
    }

    #[test]
    fn test_unsupported_platform() {
        let platform = MockPlatform::new(HostOs::Other("FreeBSD".to_string()));
        let err = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedPlatform(_)));
    }

    #[test]
    fn test_missing_home() {
        let platform = MockPlatform::new(HostOs::Linux);
        let err = resolve_state_db_path(&platform, DEFAULT_PRODUCT).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_custom_product() {
        let platform = MockPlatform::new(HostOs::Linux).with_home("/home/dev");
        let path = resolve_state_db_path(&platform, "VSCodium").unwrap();
        assert!(path.starts_with("/home/dev/.config/VSCodium"));
        assert!(resolve_state_db_path(&platform, " ").is_err());
    }

    #[test]
    fn test_backup_path() {
        let db = PathBuf::from("/home/dev/.config/Code/User/globalStorage/state.vscdb");
        assert_eq!(
            backup_path_for(&db, &HostOs::Linux),
            PathBuf::from("/home/dev/.config/Code/User/globalStorage/state.vscdb.linux.backup")
        );
        assert_eq!(
            backup_path_for(&db, &HostOs::MacOs)
                .file_name()
                .and_then(|n| n.to_str()),
            Some("state.vscdb.darwin.backup")
        );
    }
}
