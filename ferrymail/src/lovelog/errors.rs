//! Love log error types.

use thiserror::Error;

use super::models::EntryId;

/// Errors that can occur during love log operations
#[derive(Error, Debug)]
pub enum LoveLogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Operation not permitted for this user")]
    Unauthorized,

    #[error("Corrupt entry state: {0}")]
    InternalStateError(String),
}

impl LoveLogError {
    /// Get a client-safe error message that doesn't expose internal details
    pub fn client_message(&self) -> String {
        match self {
            LoveLogError::Database(_) | LoveLogError::InternalStateError(_) => {
                "Internal server error".to_string()
            }
            LoveLogError::EntryNotFound(_) => "Entry not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for love log operations
pub type LoveLogResult<T> = Result<T, LoveLogError>;
