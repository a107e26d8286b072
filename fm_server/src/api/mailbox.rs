//! Mailbox API handlers.
//!
//! Endpoints for sending messages, reading the inbox and sent folder,
//! marking messages read, and polling the unread count.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use ferrymail::mailbox::{MailboxError, Message, MessageId, SendMessageRequest, UnreadCount};

use crate::metrics;

use super::{AppState, ErrorResponse};

fn error_response(e: MailboxError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        MailboxError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        MailboxError::Unauthorized => StatusCode::FORBIDDEN,
        MailboxError::MessageNotFound(_) => StatusCode::NOT_FOUND,
        MailboxError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, ErrorResponse::new(e.client_message()))
}

/// Send a message to the other user.
///
/// # Request Body
///
/// ```json
/// {"recipient_id": 2, "body": "See you at the dock"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty body, body too long, or self-addressed
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, (StatusCode, Json<ErrorResponse>)> {
    match state.mailbox_manager.send_message(user_id, payload).await {
        Ok(message) => {
            metrics::messages_sent_total();
            Ok(Json(message))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// List messages received by the caller, newest first.
pub async fn list_inbox(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<Vec<Message>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .mailbox_manager
        .list_inbox(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// List messages sent by the caller, newest first.
pub async fn list_sent(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<Vec<Message>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .mailbox_manager
        .list_sent(user_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Mark a message as read. Recipient only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not the recipient
/// - `404 Not Found`: Unknown message id
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
    Path(message_id): Path<MessageId>,
) -> Result<Json<Message>, (StatusCode, Json<ErrorResponse>)> {
    state
        .mailbox_manager
        .mark_read(user_id, message_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Count unread messages in the caller's inbox.
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user_id): Extension<i64>,
) -> Result<Json<UnreadCount>, (StatusCode, Json<ErrorResponse>)> {
    state
        .mailbox_manager
        .unread_count(user_id)
        .await
        .map(|unread| Json(UnreadCount { unread }))
        .map_err(error_response)
}
