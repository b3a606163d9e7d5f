// Domain Layer - Pure types and validation

pub mod error;
pub mod firmware;
pub mod host;
pub mod pattern;
pub mod report;

// Re-exports
pub use error::DomainError;
pub use firmware::{FsStep, FsUploadReport, PioEnvironment, StepOutcome, DEFAULT_PROGNAME};
pub use host::HostOs;
pub use pattern::{KeyPattern, TableName, DEFAULT_KEYWORD, DEFAULT_TABLE};
pub use report::{CleanupOutcome, CleanupReport};
