//! Bucket list error types.

use thiserror::Error;

use super::models::BucketItemId;

/// Errors that can occur during bucket list operations
#[derive(Error, Debug)]
pub enum BucketError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bucket item not found: {0}")]
    ItemNotFound(BucketItemId),

    #[error("Item is already in the requested state")]
    InvalidState,

    #[error("Operation not permitted for this user")]
    Unauthorized,
}

impl BucketError {
    /// Get a client-safe error message that doesn't expose internal details
    pub fn client_message(&self) -> String {
        match self {
            BucketError::Database(_) => "Internal server error".to_string(),
            BucketError::ItemNotFound(_) => "Bucket item not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for bucket list operations
pub type BucketResult<T> = Result<T, BucketError>;
