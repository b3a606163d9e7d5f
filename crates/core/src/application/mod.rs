// Application Layer - Use Cases

pub mod cleanup;
pub mod fs_upload;
pub mod locate;

// Re-exports
pub use cleanup::{CleanupRequest, CleanupService};
pub use fs_upload::{FsUploadConfig, FsUploadService};
pub use locate::{backup_path_for, resolve_state_db_path, DEFAULT_PRODUCT};
