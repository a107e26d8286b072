//! Countdown error types.

use thiserror::Error;

use super::models::CountdownId;

/// Errors that can occur during countdown operations
#[derive(Error, Debug)]
pub enum CountdownError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Countdown not found: {0}")]
    CountdownNotFound(CountdownId),

    #[error("Operation not permitted for this user")]
    Unauthorized,
}

impl CountdownError {
    /// Get a client-safe error message that doesn't expose internal details
    pub fn client_message(&self) -> String {
        match self {
            CountdownError::Database(_) => "Internal server error".to_string(),
            CountdownError::CountdownNotFound(_) => "Countdown not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for countdown operations
pub type CountdownResult<T> = Result<T, CountdownError>;
