//! Game manager: persistence collaborator for the game engines.
//!
//! The engines in [`hangman`](super::hangman) and
//! [`two_truths`](super::two_truths) are pure; this manager loads rows,
//! invokes them, and writes the result back. Guess operations lock the row
//! (`SELECT ... FOR UPDATE`) inside a transaction so that two concurrent
//! guesses against the same game are serialized and each request performs
//! at most one state transition.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::warn;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use super::errors::{GameError, GameResult};
use super::hangman::{GameStatus, HangmanGame};
use super::models::{GameId, HangmanGameView, HangmanStats, TwoTruthsStats, TwoTruthsView};
use super::two_truths::{RoundStatus, TwoTruthsRound};
use crate::auth::UserId;

/// Game manager
#[derive(Clone)]
pub struct GameManager {
    pool: Arc<PgPool>,
}

impl GameManager {
    /// Create a new game manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Hangman
    // ------------------------------------------------------------------

    /// Create a hangman game and persist it.
    ///
    /// # Errors
    ///
    /// * `GameError::InvalidInput` - empty word, bad tier, or self-addressed
    pub async fn create_hangman(
        &self,
        creator_id: UserId,
        recipient_id: UserId,
        target_word: &str,
        hint: Option<String>,
        allowed_wrong_guesses: u8,
    ) -> GameResult<HangmanGameView> {
        let mut game = HangmanGame::new(
            creator_id,
            recipient_id,
            target_word,
            hint,
            allowed_wrong_guesses,
        )?;

        let row = sqlx::query(
            r#"
            INSERT INTO hangman_games
                (creator_id, recipient_id, target_word, hint, allowed_wrong_guesses,
                 guessed_letters, revealed_letters, wrong_guess_count, status)
            VALUES ($1, $2, $3, $4, $5, '', '', 0, $6)
            RETURNING id
            "#,
        )
        .bind(game.creator_id)
        .bind(game.recipient_id)
        .bind(&game.target_word)
        .bind(&game.hint)
        .bind(i16::from(game.allowed_wrong_guesses))
        .bind(game.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        game.id = row.get("id");
        Ok(game.view(creator_id))
    }

    /// Fetch one hangman game as seen by `viewer_id`.
    ///
    /// # Errors
    ///
    /// * `GameError::GameNotFound` - unknown id
    /// * `GameError::Unauthorized` - viewer is neither participant
    pub async fn get_hangman(
        &self,
        game_id: GameId,
        viewer_id: UserId,
    ) -> GameResult<HangmanGameView> {
        let row = sqlx::query(
            "SELECT id, creator_id, recipient_id, target_word, hint, allowed_wrong_guesses,
                    guessed_letters, revealed_letters, wrong_guess_count, status
             FROM hangman_games WHERE id = $1",
        )
        .bind(game_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(GameError::GameNotFound(game_id))?;

        let game = Self::hangman_from_row(&row)?;
        if !game.is_participant(viewer_id) {
            return Err(GameError::Unauthorized);
        }
        Ok(game.view(viewer_id))
    }

    /// List all hangman games the user takes part in, newest first.
    pub async fn list_hangman(&self, user_id: UserId) -> GameResult<Vec<HangmanGameView>> {
        let rows = sqlx::query(
            "SELECT id, creator_id, recipient_id, target_word, hint, allowed_wrong_guesses,
                    guessed_letters, revealed_letters, wrong_guess_count, status
             FROM hangman_games
             WHERE creator_id = $1 OR recipient_id = $1
             ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter()
            .map(|row| Ok(Self::hangman_from_row(row)?.view(user_id)))
            .collect()
    }

    /// Guess a single letter. Only the recipient may guess.
    pub async fn guess_letter(
        &self,
        game_id: GameId,
        user_id: UserId,
        letter: char,
    ) -> GameResult<HangmanGameView> {
        self.transition_hangman(game_id, user_id, |game| {
            game.guess_letter(letter)
        })
        .await
    }

    /// Guess the whole word. Only the recipient may guess.
    pub async fn guess_word(
        &self,
        game_id: GameId,
        user_id: UserId,
        word: &str,
    ) -> GameResult<HangmanGameView> {
        self.transition_hangman(game_id, user_id, |game| game.guess_word(word))
            .await
    }

    /// Withdraw an in-progress game. Either participant may do so; the
    /// engine rejects strangers and terminal games.
    pub async fn withdraw_hangman(
        &self,
        game_id: GameId,
        user_id: UserId,
    ) -> GameResult<HangmanGameView> {
        let mut tx = self.pool.begin().await?;
        let mut game = Self::lock_hangman(&mut tx, game_id).await?;
        game.withdraw(user_id)?;
        Self::store_hangman(&mut tx, &game).await?;
        tx.commit().await?;
        Ok(game.view(user_id))
    }

    /// Win/loss counts across every game the user takes part in.
    pub async fn hangman_stats(&self, user_id: UserId) -> GameResult<HangmanStats> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS games
             FROM hangman_games
             WHERE creator_id = $1 OR recipient_id = $1
             GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut stats = HangmanStats::default();
        for row in rows {
            let status: String = row.get("status");
            let games: i64 = row.get("games");
            match GameStatus::parse(&status) {
                Some(GameStatus::InProgress) => stats.in_progress = games,
                Some(GameStatus::Won) => stats.won = games,
                Some(GameStatus::Lost) => stats.lost = games,
                Some(GameStatus::Withdrawn) => stats.withdrawn = games,
                None => warn!("skipping unknown hangman status '{status}' in stats"),
            }
        }
        Ok(stats)
    }

    /// Run one guess transition under a row lock. The recipient check
    /// lives here rather than in the engine: the engine is told about
    /// participants, the manager decides who may act.
    async fn transition_hangman<F>(
        &self,
        game_id: GameId,
        user_id: UserId,
        transition: F,
    ) -> GameResult<HangmanGameView>
    where
        F: FnOnce(&mut HangmanGame) -> GameResult<()>,
    {
        let mut tx = self.pool.begin().await?;
        let mut game = Self::lock_hangman(&mut tx, game_id).await?;

        // The creator knows the word; only the recipient guesses.
        if user_id != game.recipient_id {
            return Err(GameError::Unauthorized);
        }

        transition(&mut game)?;
        Self::store_hangman(&mut tx, &game).await?;
        tx.commit().await?;
        Ok(game.view(user_id))
    }

    async fn lock_hangman(
        tx: &mut Transaction<'_, Postgres>,
        game_id: GameId,
    ) -> GameResult<HangmanGame> {
        let row = sqlx::query(
            "SELECT id, creator_id, recipient_id, target_word, hint, allowed_wrong_guesses,
                    guessed_letters, revealed_letters, wrong_guess_count, status
             FROM hangman_games WHERE id = $1
             FOR UPDATE",
        )
        .bind(game_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(GameError::GameNotFound(game_id))?;

        Self::hangman_from_row(&row)
    }

    async fn store_hangman(
        tx: &mut Transaction<'_, Postgres>,
        game: &HangmanGame,
    ) -> GameResult<()> {
        sqlx::query(
            "UPDATE hangman_games
             SET guessed_letters = $1, revealed_letters = $2, wrong_guess_count = $3,
                 status = $4, updated_at = NOW()
             WHERE id = $5",
        )
        .bind(game.guessed_letters.iter().collect::<String>())
        .bind(game.revealed_letters.iter().collect::<String>())
        .bind(i16::from(game.wrong_guess_count))
        .bind(game.status.as_str())
        .bind(game.id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    fn hangman_from_row(row: &PgRow) -> GameResult<HangmanGame> {
        let status: String = row.get("status");
        let status = GameStatus::parse(&status)
            .ok_or_else(|| GameError::InternalStateError(format!("status '{status}'")))?;

        let allowed: i16 = row.get("allowed_wrong_guesses");
        let wrong: i16 = row.get("wrong_guess_count");
        let guessed: String = row.get("guessed_letters");
        let revealed: String = row.get("revealed_letters");

        Ok(HangmanGame {
            id: row.get("id"),
            creator_id: row.get("creator_id"),
            recipient_id: row.get("recipient_id"),
            target_word: row.get("target_word"),
            hint: row.get("hint"),
            allowed_wrong_guesses: u8::try_from(allowed)
                .map_err(|_| GameError::InternalStateError(format!("tier {allowed}")))?,
            guessed_letters: guessed.chars().collect(),
            revealed_letters: revealed.chars().collect::<BTreeSet<char>>(),
            wrong_guess_count: u8::try_from(wrong)
                .map_err(|_| GameError::InternalStateError(format!("wrong count {wrong}")))?,
            status,
        })
    }

    // ------------------------------------------------------------------
    // Two Truths & a Lie
    // ------------------------------------------------------------------

    /// Create a round and persist it.
    pub async fn create_two_truths(
        &self,
        creator_id: UserId,
        recipient_id: UserId,
        truths: [&str; 2],
        lie: &str,
    ) -> GameResult<TwoTruthsView> {
        let mut round =
            TwoTruthsRound::new(creator_id, recipient_id, truths, lie, &mut rand::rng())?;

        let row = sqlx::query(
            r#"
            INSERT INTO two_truths_rounds
                (creator_id, recipient_id, statement_1, statement_2, statement_3,
                 lie_index, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(round.creator_id)
        .bind(round.recipient_id)
        .bind(&round.statements[0])
        .bind(&round.statements[1])
        .bind(&round.statements[2])
        .bind(i16::from(round.lie_index))
        .bind(round.status.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        round.id = row.get("id");
        Ok(round.view(creator_id))
    }

    /// Fetch one round as seen by `viewer_id`.
    pub async fn get_two_truths(
        &self,
        round_id: GameId,
        viewer_id: UserId,
    ) -> GameResult<TwoTruthsView> {
        let row = sqlx::query(
            "SELECT id, creator_id, recipient_id, statement_1, statement_2, statement_3,
                    lie_index, guess_index, guessed_correctly, status
             FROM two_truths_rounds WHERE id = $1",
        )
        .bind(round_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(GameError::GameNotFound(round_id))?;

        let round = Self::round_from_row(&row)?;
        if !round.is_participant(viewer_id) {
            return Err(GameError::Unauthorized);
        }
        Ok(round.view(viewer_id))
    }

    /// List all rounds the user takes part in, newest first.
    pub async fn list_two_truths(&self, user_id: UserId) -> GameResult<Vec<TwoTruthsView>> {
        let rows = sqlx::query(
            "SELECT id, creator_id, recipient_id, statement_1, statement_2, statement_3,
                    lie_index, guess_index, guessed_correctly, status
             FROM two_truths_rounds
             WHERE creator_id = $1 OR recipient_id = $1
             ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter()
            .map(|row| Ok(Self::round_from_row(row)?.view(user_id)))
            .collect()
    }

    /// The recipient's one guess at the lie, under a row lock.
    pub async fn guess_two_truths(
        &self,
        round_id: GameId,
        user_id: UserId,
        statement_index: u8,
    ) -> GameResult<TwoTruthsView> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT id, creator_id, recipient_id, statement_1, statement_2, statement_3,
                    lie_index, guess_index, guessed_correctly, status
             FROM two_truths_rounds WHERE id = $1
             FOR UPDATE",
        )
        .bind(round_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(GameError::GameNotFound(round_id))?;

        let mut round = Self::round_from_row(&row)?;
        round.guess(user_id, statement_index)?;

        sqlx::query(
            "UPDATE two_truths_rounds
             SET guess_index = $1, guessed_correctly = $2, status = $3, updated_at = NOW()
             WHERE id = $4",
        )
        .bind(round.guess_index.map(i16::from))
        .bind(round.guessed_correctly)
        .bind(round.status.as_str())
        .bind(round.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(round.view(user_id))
    }

    /// Rounds guessed/correct for the user as the guessing side.
    pub async fn two_truths_stats(&self, user_id: UserId) -> GameResult<TwoTruthsStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS rounds_guessed,
                    COUNT(*) FILTER (WHERE guessed_correctly) AS correct_guesses
             FROM two_truths_rounds
             WHERE recipient_id = $1 AND status = 'guessed'",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(TwoTruthsStats {
            rounds_guessed: row.get("rounds_guessed"),
            correct_guesses: row.get("correct_guesses"),
        })
    }

    fn round_from_row(row: &PgRow) -> GameResult<TwoTruthsRound> {
        let status: String = row.get("status");
        let status = RoundStatus::parse(&status)
            .ok_or_else(|| GameError::InternalStateError(format!("status '{status}'")))?;

        let lie_index: i16 = row.get("lie_index");
        let guess_index: Option<i16> = row.get("guess_index");

        Ok(TwoTruthsRound {
            id: row.get("id"),
            creator_id: row.get("creator_id"),
            recipient_id: row.get("recipient_id"),
            statements: vec![
                row.get("statement_1"),
                row.get("statement_2"),
                row.get("statement_3"),
            ],
            lie_index: u8::try_from(lie_index)
                .map_err(|_| GameError::InternalStateError(format!("lie index {lie_index}")))?,
            guess_index: guess_index
                .map(|i| {
                    u8::try_from(i).map_err(|_| {
                        GameError::InternalStateError(format!("guess index {i}"))
                    })
                })
                .transpose()?,
            guessed_correctly: row.get("guessed_correctly"),
            status,
        })
    }
}
