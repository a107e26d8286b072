//! Countdown API handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ferrymail::countdown::{
    Countdown, CountdownError, CountdownId, CountdownView, CreateCountdownRequest,
};

use super::{AppState, ErrorResponse};

fn error_response(e: CountdownError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        CountdownError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CountdownError::Unauthorized => StatusCode::FORBIDDEN,
        CountdownError::CountdownNotFound(_) => StatusCode::NOT_FOUND,
        CountdownError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, ErrorResponse::new(e.client_message()))
}

/// Create a countdown towards a future moment.
///
/// # Request Body
///
/// ```json
/// {"title": "Next visit", "target_at": "2026-09-12T18:00:00Z"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty title or target not in the future
pub async fn create_countdown(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<CreateCountdownRequest>,
) -> Result<Json<Countdown>, (StatusCode, Json<ErrorResponse>)> {
    state
        .countdown_manager
        .create_countdown(user_id, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List all countdowns with computed remaining time, soonest first.
pub async fn list_countdowns(
    State(state): State<AppState>,
    Extension(_user_id): Extension<i64>,
) -> Result<Json<Vec<CountdownView>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .countdown_manager
        .list_countdowns()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Delete a countdown. Creator only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the creator
/// - `404 Not Found`: Unknown countdown id
pub async fn delete_countdown(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(countdown_id): Path<CountdownId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .countdown_manager
        .delete_countdown(user_id, countdown_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
