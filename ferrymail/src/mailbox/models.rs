//! Mailbox data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Message identifier type
pub type MessageId = i64;

/// Maximum length of a message body in characters
pub const MAX_BODY_LENGTH: usize = 4000;

/// A message delivered from one user to the other
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to send a new message
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: UserId,
    pub body: String,
}

/// Count of unread messages in a user's inbox
#[derive(Debug, Clone, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}
