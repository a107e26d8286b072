//! Games API handlers for Hangman and Two Truths & a Lie.
//!
//! All endpoints require authentication; the middleware injects the caller's
//! user id and the managers enforce who may act on each game.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ferrymail::games::{
    GameError, GameId, HangmanGameView, HangmanStats, TwoTruthsStats, TwoTruthsView,
};
use serde::{Deserialize, Serialize};

use crate::metrics;

use super::{AppState, ErrorResponse};

#[derive(Debug, Deserialize)]
pub struct CreateHangmanPayload {
    pub recipient_id: i64,
    pub word: String,
    pub hint: Option<String>,
    pub allowed_wrong_guesses: u8,
}

#[derive(Debug, Deserialize)]
pub struct GuessLetterPayload {
    /// Single-character string; multi-character input is a 400, not a 422.
    pub letter: String,
}

#[derive(Debug, Deserialize)]
pub struct GuessWordPayload {
    pub word: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTwoTruthsPayload {
    pub recipient_id: i64,
    pub truths: [String; 2],
    pub lie: String,
}

#[derive(Debug, Deserialize)]
pub struct GuessTwoTruthsPayload {
    pub statement_index: u8,
}

#[derive(Debug, Serialize)]
pub struct WithdrawResponse {
    pub success: bool,
    pub game: HangmanGameView,
}

fn error_response(e: GameError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        GameError::InvalidInput(_) | GameError::AlreadyGuessed(_) | GameError::InvalidState => {
            StatusCode::BAD_REQUEST
        }
        GameError::Unauthorized => StatusCode::FORBIDDEN,
        GameError::GameNotFound(_) => StatusCode::NOT_FOUND,
        GameError::Database(_) | GameError::InternalStateError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, ErrorResponse::new(e.client_message()))
}

// ============================================================================
// Hangman
// ============================================================================

/// Create a hangman game for the other user to solve.
///
/// # Request Body
///
/// ```json
/// {"recipient_id": 2, "word": "lighthouse", "hint": "guides ships", "allowed_wrong_guesses": 6}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed word, bad difficulty tier, or self-play
pub async fn create_hangman(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<CreateHangmanPayload>,
) -> Result<Json<HangmanGameView>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .game_manager
        .create_hangman(
            user_id,
            payload.recipient_id,
            &payload.word,
            payload.hint,
            payload.allowed_wrong_guesses,
        )
        .await
    {
        Ok(view) => {
            metrics::games_created_total("hangman");
            Ok(Json(view))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// List every hangman game the caller takes part in, newest first.
pub async fn list_hangman(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<Vec<HangmanGameView>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .list_hangman(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// View one hangman game.
///
/// The target word is included for the creator, and for everyone once the
/// game has finished.
pub async fn get_hangman(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(game_id): Path<GameId>,
) -> Result<Json<HangmanGameView>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .get_hangman(game_id, user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Guess a single letter. Recipient only.
///
/// # Request Body
///
/// ```json
/// {"letter": "e"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-letter guess, repeated letter, or finished game
/// - `403 Forbidden`: Caller is not the recipient
pub async fn guess_letter(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(game_id): Path<GameId>,
    Json(payload): Json<GuessLetterPayload>,
) -> Result<Json<HangmanGameView>, (StatusCode, Json<ErrorResponse>)> {
    let mut chars = payload.letter.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(error_response(GameError::InvalidInput(
                "guess exactly one letter".to_string(),
            )));
        }
    };

    match state
        .game_manager
        .guess_letter(game_id, user_id, letter)
        .await
    {
        Ok(view) => {
            metrics::guesses_total("hangman");
            Ok(Json(view))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Guess the whole word. Recipient only; a miss costs one wrong guess.
///
/// # Request Body
///
/// ```json
/// {"word": "lighthouse"}
/// ```
pub async fn guess_word(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(game_id): Path<GameId>,
    Json(payload): Json<GuessWordPayload>,
) -> Result<Json<HangmanGameView>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .game_manager
        .guess_word(game_id, user_id, &payload.word)
        .await
    {
        Ok(view) => {
            metrics::guesses_total("hangman");
            Ok(Json(view))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Withdraw an in-progress game. Either participant may do this.
///
/// # Errors
///
/// - `400 Bad Request`: Game already finished
/// - `403 Forbidden`: Caller is not a participant
pub async fn withdraw_hangman(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(game_id): Path<GameId>,
) -> Result<Json<WithdrawResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .withdraw_hangman(game_id, user_id)
        .await
        .map(|game| {
            Json(WithdrawResponse {
                success: true,
                game,
            })
        })
        .map_err(error_response)
}

/// Win/loss counts across every game the caller takes part in.
pub async fn hangman_stats(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<HangmanStats>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .hangman_stats(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// Two Truths & a Lie
// ============================================================================

/// Create a round of Two Truths & a Lie.
///
/// Statement display order is shuffled once at creation.
///
/// # Request Body
///
/// ```json
/// {"recipient_id": 2, "truths": ["I ran a marathon", "I hate olives"], "lie": "I met a whale"}
/// ```
pub async fn create_two_truths(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<CreateTwoTruthsPayload>,
) -> Result<Json<TwoTruthsView>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .game_manager
        .create_two_truths(
            user_id,
            payload.recipient_id,
            [payload.truths[0].as_str(), payload.truths[1].as_str()],
            &payload.lie,
        )
        .await
    {
        Ok(view) => {
            metrics::games_created_total("two_truths");
            Ok(Json(view))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// List every round the caller takes part in, newest first.
pub async fn list_two_truths(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<Vec<TwoTruthsView>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .list_two_truths(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// View one round. The lie stays hidden from the recipient until guessed.
pub async fn get_two_truths(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(round_id): Path<GameId>,
) -> Result<Json<TwoTruthsView>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .get_two_truths(round_id, user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Guess which statement is the lie. Recipient only, one shot.
///
/// # Request Body
///
/// ```json
/// {"statement_index": 1}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Index out of range or round already guessed
/// - `403 Forbidden`: Caller is not the recipient
pub async fn guess_two_truths(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(round_id): Path<GameId>,
    Json(payload): Json<GuessTwoTruthsPayload>,
) -> Result<Json<TwoTruthsView>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .game_manager
        .guess_two_truths(round_id, user_id, payload.statement_index)
        .await
    {
        Ok(view) => {
            metrics::guesses_total("two_truths");
            Ok(Json(view))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// Rounds guessed and correct guesses for the caller as the guessing side.
pub async fn two_truths_stats(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<TwoTruthsStats>, (StatusCode, Json<ErrorResponse>)> {
    state
        .game_manager
        .two_truths_stats(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}
