//! Game view models.
//!
//! Views are viewer-specific projections of game state: what a caller is
//! allowed to see depends on whether they created the game and whether it
//! has finished. They are computed on read and never persisted.

use serde::{Deserialize, Serialize};

use super::hangman::GameStatus;
use super::two_truths::RoundStatus;
use crate::auth::UserId;

/// Game ID type
pub type GameId = i64;

/// What one viewer sees of a hangman game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HangmanGameView {
    pub id: GameId,
    pub creator_id: UserId,
    pub recipient_id: UserId,
    pub status: GameStatus,
    pub masked_word: String,
    /// Present for the creator, and for everyone once the game is terminal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
    /// Present for the creator, and for the recipient once unlocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub guessed_letters: Vec<char>,
    pub revealed_letters: Vec<char>,
    pub wrong_guess_count: u8,
    pub remaining_guesses: u8,
    pub allowed_wrong_guesses: u8,
}

/// Historical win/loss counts for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HangmanStats {
    pub in_progress: i64,
    pub won: i64,
    pub lost: i64,
    pub withdrawn: i64,
}

/// What one viewer sees of a Two Truths & a Lie round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoTruthsView {
    pub id: GameId,
    pub creator_id: UserId,
    pub recipient_id: UserId,
    pub status: RoundStatus,
    /// Statements in their fixed display order.
    pub statements: Vec<String>,
    /// Present for the creator, and for everyone once guessed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lie_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guessed_correctly: Option<bool>,
}

/// Rounds played/won as the guessing side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwoTruthsStats {
    pub rounds_guessed: i64,
    pub correct_guesses: i64,
}
