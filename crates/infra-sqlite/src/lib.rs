// devtidy Infrastructure - SQLite Adapter
// Implements: StateStore, StateStoreOpener

mod connection;
mod state_store;

pub use connection::open_existing;
pub use state_store::{SqliteStateStore, SqliteStateStoreOpener};

// Note: sqlx::Error conversion is handled by mapping to AppError::Database
// at each call site (orphan rules: cannot implement From<sqlx::Error> for AppError here)
