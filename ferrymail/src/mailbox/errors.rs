//! Mailbox error types.

use thiserror::Error;

use super::models::MessageId;

/// Errors that can occur during mailbox operations
#[derive(Error, Debug)]
pub enum MailboxError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Operation not permitted for this user")]
    Unauthorized,
}

impl MailboxError {
    /// Get a client-safe error message that doesn't expose internal details
    pub fn client_message(&self) -> String {
        match self {
            MailboxError::Database(_) => "Internal server error".to_string(),
            MailboxError::MessageNotFound(_) => "Message not found".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for mailbox operations
pub type MailboxResult<T> = Result<T, MailboxError>;
