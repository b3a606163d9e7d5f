// devtidy Infrastructure - System Adapters
// Implements: PlatformProbe, FileSystem, CommandRunner

pub mod file_system_impl;
pub mod platform_impl;
pub mod subprocess_runner;

pub use file_system_impl::LocalFileSystem;
pub use platform_impl::SystemPlatform;
pub use subprocess_runner::SubprocessRunner;
