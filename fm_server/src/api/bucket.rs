//! Bucket list API handlers.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ferrymail::bucket::{AddBucketItemRequest, BucketError, BucketItem, BucketItemId};

use super::{AppState, ErrorResponse};

fn error_response(e: BucketError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        BucketError::InvalidInput(_) | BucketError::InvalidState => StatusCode::BAD_REQUEST,
        BucketError::Unauthorized => StatusCode::FORBIDDEN,
        BucketError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        BucketError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, ErrorResponse::new(e.client_message()))
}

/// Add an item to the shared bucket list.
///
/// # Request Body
///
/// ```json
/// {"title": "Kayak the fjord", "notes": "Rent gear in town"}
/// ```
pub async fn add_item(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<AddBucketItemRequest>,
) -> Result<Json<BucketItem>, (StatusCode, Json<ErrorResponse>)> {
    state
        .bucket_manager
        .add_item(user_id, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List all bucket items, open items first.
pub async fn list_items(
    State(state): State<AppState>,
    Extension(_user_id): Extension<i64>,
) -> Result<Json<Vec<BucketItem>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .bucket_manager
        .list_items()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Mark an item as completed. Either user may do this.
///
/// # Errors
///
/// - `400 Bad Request`: Item already completed
/// - `404 Not Found`: Unknown item id
pub async fn complete_item(
    State(state): State<AppState>,
    Extension(_user_id): Extension<i64>,
    Path(item_id): Path<BucketItemId>,
) -> Result<Json<BucketItem>, (StatusCode, Json<ErrorResponse>)> {
    state
        .bucket_manager
        .complete_item(item_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Reopen a completed item. Either user may do this.
///
/// # Errors
///
/// - `400 Bad Request`: Item is not completed
/// - `404 Not Found`: Unknown item id
pub async fn reopen_item(
    State(state): State<AppState>,
    Extension(_user_id): Extension<i64>,
    Path(item_id): Path<BucketItemId>,
) -> Result<Json<BucketItem>, (StatusCode, Json<ErrorResponse>)> {
    state
        .bucket_manager
        .reopen_item(item_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Delete an item. Creator only.
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(item_id): Path<BucketItemId>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .bucket_manager
        .delete_item(user_id, item_id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
