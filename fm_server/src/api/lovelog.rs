//! Love log API handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ferrymail::lovelog::{CreateEntryRequest, EntryId, LoveLogEntry, LoveLogError};

use super::{AppState, ErrorResponse};

fn error_response(e: LoveLogError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        LoveLogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LoveLogError::Unauthorized => StatusCode::FORBIDDEN,
        LoveLogError::EntryNotFound(_) => StatusCode::NOT_FOUND,
        LoveLogError::Database(_) | LoveLogError::InternalStateError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, ErrorResponse::new(e.client_message()))
}

/// Record a mood journal entry.
///
/// # Request Body
///
/// ```json
/// {"mood": "loved", "note": "Got your postcard today"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown mood or empty note
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<Json<LoveLogEntry>, (StatusCode, Json<ErrorResponse>)> {
    state
        .lovelog_manager
        .create_entry(user_id, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List all entries from both users, newest first.
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(_user_id): Extension<i64>,
) -> Result<Json<Vec<LoveLogEntry>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .lovelog_manager
        .list_entries()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Delete an entry. Author only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the author
/// - `404 Not Found`: Unknown entry id
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(entry_id): Path<EntryId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .lovelog_manager
        .delete_entry(user_id, entry_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
