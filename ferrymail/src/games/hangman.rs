//! Hangman game engine.
//!
//! Pure state-transition logic over a [`HangmanGame`] value. The engine owns
//! no I/O: loading and storing rows is the job of
//! [`GameManager`](super::GameManager), and actor authentication is the job
//! of the request handlers. Every operation either returns the mutated game
//! or a typed [`GameError`] and leaves the game untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::errors::{GameError, GameResult};
use super::models::{GameId, HangmanGameView};
use crate::auth::UserId;

/// The two difficulty tiers: how many wrong guesses end the game.
pub const WRONG_GUESS_TIERS: [u8; 2] = [6, 9];

/// The hint becomes visible once this many wrong guesses have accumulated.
pub const HINT_UNLOCK_WRONG_GUESSES: u8 = 4;

/// Lifecycle of a hangman game. Transitions are forward-only: once a game
/// leaves `InProgress` it never changes again.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
    Withdrawn,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            "withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Self::InProgress
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One hangman puzzle exchanged between the two users.
///
/// Invariants maintained by the transition methods:
/// - `wrong_guess_count` only ever increases, and never past
///   `allowed_wrong_guesses` while the game is in progress.
/// - `revealed_letters` is always a subset of `guessed_letters`.
/// - a terminal `status` is never left.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HangmanGame {
    pub id: GameId,
    pub creator_id: UserId,
    pub recipient_id: UserId,
    /// Lowercase alphabetic word, possibly with spaces for phrases.
    pub target_word: String,
    pub hint: Option<String>,
    /// One of [`WRONG_GUESS_TIERS`], fixed at creation.
    pub allowed_wrong_guesses: u8,
    /// Letters attempted so far, in guess order.
    pub guessed_letters: Vec<char>,
    /// Guessed letters that occur in the target word.
    pub revealed_letters: BTreeSet<char>,
    pub wrong_guess_count: u8,
    pub status: GameStatus,
}

impl HangmanGame {
    /// Create a new game in `in_progress` with empty guess state.
    ///
    /// The target word is trimmed and lowercased. It must contain at least
    /// one letter and nothing but ASCII letters and spaces. The id is zero
    /// until the persistence layer assigns one.
    ///
    /// # Errors
    ///
    /// `GameError::InvalidInput` if the word is empty or malformed, the
    /// difficulty tier is not 6 or 9, or creator and recipient coincide.
    pub fn new(
        creator_id: UserId,
        recipient_id: UserId,
        target_word: &str,
        hint: Option<String>,
        allowed_wrong_guesses: u8,
    ) -> GameResult<Self> {
        if creator_id == recipient_id {
            return Err(GameError::InvalidInput(
                "you cannot play against yourself".to_string(),
            ));
        }

        if !WRONG_GUESS_TIERS.contains(&allowed_wrong_guesses) {
            return Err(GameError::InvalidInput(format!(
                "allowed wrong guesses must be one of {WRONG_GUESS_TIERS:?}"
            )));
        }

        let target_word = target_word.trim().to_lowercase();
        if target_word.is_empty() {
            return Err(GameError::InvalidInput(
                "the word must not be empty".to_string(),
            ));
        }
        if !target_word
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == ' ')
        {
            return Err(GameError::InvalidInput(
                "the word may only contain letters and spaces".to_string(),
            ));
        }
        if !target_word.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(GameError::InvalidInput(
                "the word must contain at least one letter".to_string(),
            ));
        }

        let hint = hint
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok(Self {
            id: 0,
            creator_id,
            recipient_id,
            target_word,
            hint,
            allowed_wrong_guesses,
            guessed_letters: Vec::new(),
            revealed_letters: BTreeSet::new(),
            wrong_guess_count: 0,
            status: GameStatus::InProgress,
        })
    }

    /// Guess a single letter.
    ///
    /// Exactly one of two things happens on success: the letter is revealed,
    /// or the wrong-guess count goes up by one. Afterwards the game may
    /// transition to `won` (every letter of the word revealed) or `lost`
    /// (wrong guesses exhausted).
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the game is already finished.
    /// - `InvalidInput` if `letter` is not an ASCII letter.
    /// - `AlreadyGuessed` if the letter was attempted before; state is
    ///   unchanged.
    pub fn guess_letter(&mut self, letter: char) -> GameResult<()> {
        if self.status.is_terminal() {
            return Err(GameError::InvalidState);
        }

        let letter = letter.to_ascii_lowercase();
        if !letter.is_ascii_lowercase() {
            return Err(GameError::InvalidInput(format!(
                "'{letter}' is not a letter"
            )));
        }

        if self.guessed_letters.contains(&letter) {
            return Err(GameError::AlreadyGuessed(letter));
        }

        self.guessed_letters.push(letter);
        if self.target_word.contains(letter) {
            self.revealed_letters.insert(letter);
            if self.all_letters_revealed() {
                self.status = GameStatus::Won;
            }
        } else {
            self.wrong_guess_count += 1;
            if self.wrong_guess_count >= self.allowed_wrong_guesses {
                self.status = GameStatus::Lost;
            }
        }

        Ok(())
    }

    /// Guess the whole word.
    ///
    /// An exact match (after trimming and lowercasing) reveals every letter
    /// and wins the game. A mismatch costs a single wrong guess no matter
    /// how many letters overlap.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the game is already finished.
    /// - `InvalidInput` if the guess is empty.
    pub fn guess_word(&mut self, word: &str) -> GameResult<()> {
        if self.status.is_terminal() {
            return Err(GameError::InvalidState);
        }

        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(GameError::InvalidInput(
                "the guess must not be empty".to_string(),
            ));
        }

        if word == self.target_word {
            let letters: Vec<char> = self
                .target_word
                .chars()
                .filter(char::is_ascii_lowercase)
                .collect();
            self.revealed_letters.extend(letters);
            self.status = GameStatus::Won;
        } else {
            self.wrong_guess_count += 1;
            if self.wrong_guess_count >= self.allowed_wrong_guesses {
                self.status = GameStatus::Lost;
            }
        }

        Ok(())
    }

    /// Withdraw an in-progress game. Either participant may do so.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `requester_id` is neither creator nor recipient.
    /// - `InvalidState` if the game is already terminal; a finished game
    ///   cannot be withdrawn.
    pub fn withdraw(&mut self, requester_id: UserId) -> GameResult<()> {
        if requester_id != self.creator_id && requester_id != self.recipient_id {
            return Err(GameError::Unauthorized);
        }
        if self.status.is_terminal() {
            return Err(GameError::InvalidState);
        }
        self.status = GameStatus::Withdrawn;
        Ok(())
    }

    /// Display form of the word: revealed letters as themselves, hidden
    /// letters as `_`, spaces preserved. Recomputed on every read, never
    /// stored.
    pub fn masked_word(&self) -> String {
        self.target_word
            .chars()
            .map(|c| {
                if c == ' ' || self.revealed_letters.contains(&c) {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub fn remaining_guesses(&self) -> u8 {
        self.allowed_wrong_guesses
            .saturating_sub(self.wrong_guess_count)
    }

    /// The hint unlocks after [`HINT_UNLOCK_WRONG_GUESSES`] wrong guesses.
    pub fn hint_visible(&self) -> bool {
        self.wrong_guess_count >= HINT_UNLOCK_WRONG_GUESSES
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        user_id == self.creator_id || user_id == self.recipient_id
    }

    fn all_letters_revealed(&self) -> bool {
        self.target_word
            .chars()
            .filter(char::is_ascii_lowercase)
            .all(|c| self.revealed_letters.contains(&c))
    }

    /// Project the game for a particular viewer. The target word is shown
    /// to the creator (they chose it) and to anyone once the game is over;
    /// the hint is shown to the creator, or to the recipient once unlocked.
    pub fn view(&self, viewer_id: UserId) -> HangmanGameView {
        let is_creator = viewer_id == self.creator_id;
        let target_word = (is_creator || self.status.is_terminal())
            .then(|| self.target_word.clone());
        let hint = if is_creator || self.hint_visible() || self.status.is_terminal() {
            self.hint.clone()
        } else {
            None
        };

        HangmanGameView {
            id: self.id,
            creator_id: self.creator_id,
            recipient_id: self.recipient_id,
            status: self.status,
            masked_word: self.masked_word(),
            target_word,
            hint,
            guessed_letters: self.guessed_letters.clone(),
            revealed_letters: self.revealed_letters.iter().copied().collect(),
            wrong_guess_count: self.wrong_guess_count,
            remaining_guesses: self.remaining_guesses(),
            allowed_wrong_guesses: self.allowed_wrong_guesses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(word: &str, allowed: u8) -> HangmanGame {
        HangmanGame::new(1, 2, word, None, allowed).expect("valid game")
    }

    #[test]
    fn test_new_game_starts_empty() {
        let g = game("cat", 6);
        assert_eq!(g.status, GameStatus::InProgress);
        assert!(g.guessed_letters.is_empty());
        assert!(g.revealed_letters.is_empty());
        assert_eq!(g.wrong_guess_count, 0);
        assert_eq!(g.masked_word(), "___");
    }

    #[test]
    fn test_new_game_normalizes_word() {
        let g = HangmanGame::new(1, 2, "  Ferry Boat ", None, 9).unwrap();
        assert_eq!(g.target_word, "ferry boat");
    }

    #[test]
    fn test_new_game_rejects_bad_input() {
        assert!(matches!(
            HangmanGame::new(1, 2, "", None, 6),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            HangmanGame::new(1, 2, "   ", None, 6),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            HangmanGame::new(1, 2, "cat!", None, 6),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            HangmanGame::new(1, 2, "cat", None, 7),
            Err(GameError::InvalidInput(_))
        ));
        assert!(matches!(
            HangmanGame::new(1, 1, "cat", None, 6),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_scenario_a_win_by_letters() {
        let mut g = game("cat", 6);

        g.guess_letter('a').unwrap();
        assert_eq!(g.revealed_letters.iter().copied().collect::<Vec<_>>(), ['a']);
        assert_eq!(g.wrong_guess_count, 0);
        assert_eq!(g.masked_word(), "_a_");

        g.guess_letter('z').unwrap();
        assert_eq!(g.wrong_guess_count, 1);

        g.guess_letter('c').unwrap();
        g.guess_letter('t').unwrap();
        assert_eq!(g.status, GameStatus::Won);
        assert_eq!(g.masked_word(), "cat");
    }

    #[test]
    fn test_scenario_b_loss_after_six_wrong() {
        let mut g = game("dog", 6);
        for (i, c) in ['x', 'y', 'z', 'q', 'w', 'v'].into_iter().enumerate() {
            g.guess_letter(c).unwrap();
            assert_eq!(g.wrong_guess_count as usize, i + 1);
        }
        assert_eq!(g.status, GameStatus::Lost);
        assert_eq!(g.wrong_guess_count, 6);
        assert_eq!(g.remaining_guesses(), 0);
    }

    #[test]
    fn test_scenario_c_word_guess_wins_immediately() {
        let mut g = game("cat", 6);
        g.guess_word("cat").unwrap();
        assert_eq!(g.status, GameStatus::Won);
        assert_eq!(g.masked_word(), "cat");
    }

    #[test]
    fn test_scenario_d_withdraw_by_stranger_rejected() {
        let mut g = game("cat", 6);
        let before = g.clone();
        assert!(matches!(g.withdraw(99), Err(GameError::Unauthorized)));
        assert_eq!(g, before);
    }

    #[test]
    fn test_repeat_guess_rejected_without_mutation() {
        let mut g = game("cat", 6);
        g.guess_letter('a').unwrap();
        g.guess_letter('z').unwrap();
        let before = g.clone();

        assert!(matches!(g.guess_letter('a'), Err(GameError::AlreadyGuessed('a'))));
        assert!(matches!(g.guess_letter('z'), Err(GameError::AlreadyGuessed('z'))));
        assert_eq!(g, before);
    }

    #[test]
    fn test_uppercase_guess_is_normalized() {
        let mut g = game("cat", 6);
        g.guess_letter('A').unwrap();
        assert!(g.revealed_letters.contains(&'a'));
        assert!(matches!(g.guess_letter('a'), Err(GameError::AlreadyGuessed('a'))));
    }

    #[test]
    fn test_non_letter_guess_rejected() {
        let mut g = game("cat", 6);
        assert!(matches!(g.guess_letter('3'), Err(GameError::InvalidInput(_))));
        assert!(matches!(g.guess_letter(' '), Err(GameError::InvalidInput(_))));
        assert!(g.guessed_letters.is_empty());
    }

    #[test]
    fn test_wrong_word_guess_costs_exactly_one() {
        let mut g = game("cat", 6);
        // Heavy letter overlap still costs a single wrong guess.
        g.guess_word("car").unwrap();
        assert_eq!(g.wrong_guess_count, 1);
        assert!(g.guessed_letters.is_empty());
        assert_eq!(g.status, GameStatus::InProgress);
    }

    #[test]
    fn test_wrong_word_guess_can_lose_the_game() {
        let mut g = game("dog", 6);
        for c in ['x', 'y', 'z', 'q', 'w'] {
            g.guess_letter(c).unwrap();
        }
        g.guess_word("cat").unwrap();
        assert_eq!(g.status, GameStatus::Lost);
        assert_eq!(g.wrong_guess_count, 6);
    }

    #[test]
    fn test_terminal_game_accepts_no_mutation() {
        let mut g = game("cat", 6);
        g.guess_word("cat").unwrap();
        let before = g.clone();

        assert!(matches!(g.guess_letter('x'), Err(GameError::InvalidState)));
        assert!(matches!(g.guess_word("dog"), Err(GameError::InvalidState)));
        assert!(matches!(g.withdraw(1), Err(GameError::InvalidState)));
        assert_eq!(g, before);
    }

    #[test]
    fn test_withdraw_by_either_participant() {
        let mut g = game("cat", 6);
        g.withdraw(2).unwrap();
        assert_eq!(g.status, GameStatus::Withdrawn);

        let mut g = game("cat", 6);
        g.withdraw(1).unwrap();
        assert_eq!(g.status, GameStatus::Withdrawn);
    }

    #[test]
    fn test_phrase_masking_preserves_spaces() {
        let mut g = game("ferry boat", 9);
        assert_eq!(g.masked_word(), "_____ ____");
        g.guess_letter('r').unwrap();
        g.guess_letter('o').unwrap();
        assert_eq!(g.masked_word(), "__rr_ _o__");
    }

    #[test]
    fn test_phrase_win_ignores_spaces() {
        let mut g = game("go on", 6);
        g.guess_letter('g').unwrap();
        g.guess_letter('o').unwrap();
        assert_eq!(g.status, GameStatus::InProgress);
        g.guess_letter('n').unwrap();
        assert_eq!(g.status, GameStatus::Won);
    }

    #[test]
    fn test_hint_unlocks_after_four_wrong_guesses() {
        let mut g = HangmanGame::new(1, 2, "cat", Some("animal".to_string()), 9).unwrap();
        for c in ['x', 'y', 'z'] {
            g.guess_letter(c).unwrap();
        }
        assert!(!g.hint_visible());
        assert_eq!(g.view(2).hint, None);

        g.guess_letter('q').unwrap();
        assert!(g.hint_visible());
        assert_eq!(g.view(2).hint.as_deref(), Some("animal"));
    }

    #[test]
    fn test_view_hides_target_word_from_recipient() {
        let mut g = game("cat", 6);
        assert_eq!(g.view(2).target_word, None);
        assert_eq!(g.view(1).target_word.as_deref(), Some("cat"));

        g.guess_word("cat").unwrap();
        assert_eq!(g.view(2).target_word.as_deref(), Some("cat"));
    }

    #[test]
    fn test_view_remaining_guesses() {
        let mut g = game("cat", 9);
        g.guess_letter('x').unwrap();
        let view = g.view(2);
        assert_eq!(view.wrong_guess_count, 1);
        assert_eq!(view.remaining_guesses, 8);
        assert_eq!(view.allowed_wrong_guesses, 9);
    }
}
