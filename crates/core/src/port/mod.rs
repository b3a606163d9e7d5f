// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod file_system;
pub mod platform;
pub mod state_store;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use command_runner::{
    CommandRunner, CommandSpec, ExecutionError, ExecutionResult, ExecutionStatus,
};
pub use file_system::FileSystem;
pub use platform::PlatformProbe;
pub use state_store::{StateStore, StateStoreOpener};
pub use time_provider::TimeProvider;
