// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Search keyword must not be empty")]
    EmptyKeyword,

    #[error("Invalid table name: {0} (expected a plain SQL identifier)")]
    InvalidTableName(String),

    #[error("Invalid PlatformIO environment: {0:?}")]
    InvalidEnvironment(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
