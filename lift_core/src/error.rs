//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
///
/// The first three variants are the failures a user can cause and is shown
/// directly; the rest come from storage and configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A workout, exercise, set or template id did not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before anything was written
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation conflicts with the current workout lifecycle state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for validation, not-found and state-conflict failures
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::InvalidArgument(_) | Error::InvalidState(_)
        )
    }
}
