//! Games module: Hangman and Two Truths & a Lie.
//!
//! Both games follow the same split: a pure engine with no I/O
//! ([`hangman`], [`two_truths`]) and a persistence collaborator
//! ([`GameManager`]) that loads rows, runs one transition, and writes the
//! result back atomically. Request handlers authenticate the caller and
//! pass the user id explicitly into every call.
//!
//! ## Example
//!
//! ```
//! use ferrymail::games::{GameStatus, HangmanGame};
//!
//! let mut game = HangmanGame::new(1, 2, "cat", None, 6)?;
//! game.guess_letter('a')?;
//! assert_eq!(game.masked_word(), "_a_");
//! game.guess_word("cat")?;
//! assert_eq!(game.status, GameStatus::Won);
//! # Ok::<(), ferrymail::games::GameError>(())
//! ```

pub mod errors;
pub mod hangman;
pub mod manager;
pub mod models;
pub mod two_truths;

pub use errors::{GameError, GameResult};
pub use hangman::{GameStatus, HINT_UNLOCK_WRONG_GUESSES, HangmanGame, WRONG_GUESS_TIERS};
pub use manager::GameManager;
pub use models::{GameId, HangmanGameView, HangmanStats, TwoTruthsStats, TwoTruthsView};
pub use two_truths::{RoundStatus, STATEMENT_COUNT, TwoTruthsRound};
