//! Game error types.

use thiserror::Error;

/// Game errors
#[derive(Debug, Error)]
pub enum GameError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed letter, word, statement, or difficulty tier
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Repeat letter guess; the game state is unchanged
    #[error("Letter '{0}' was already guessed")]
    AlreadyGuessed(char),

    /// Operation attempted on a terminal game
    #[error("This game is already finished")]
    InvalidState,

    /// Caller is not the actor this operation belongs to
    #[error("You are not allowed to do that in this game")]
    Unauthorized,

    /// Unknown game id
    #[error("Game {0} not found")]
    GameNotFound(i64),

    /// A persisted row could not be interpreted as a game
    #[error("Invalid game state: {0}")]
    InternalStateError(String),
}

impl GameError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database and row-decoding errors are sanitized to prevent information
    /// disclosure about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            GameError::Database(_) | GameError::InternalStateError(_) => {
                "Internal server error".to_string()
            }
            // Don't echo back game ids we looked up on a caller's behalf
            GameError::GameNotFound(_) => "Game not found".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
