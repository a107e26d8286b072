//! Mailbox manager implementation.

use std::sync::Arc;

use sqlx::{PgPool, Row, postgres::PgRow};

use crate::auth::UserId;

use super::{
    errors::{MailboxError, MailboxResult},
    models::{MAX_BODY_LENGTH, Message, MessageId, SendMessageRequest},
};

/// Mailbox manager
#[derive(Clone)]
pub struct MailboxManager {
    pool: Arc<PgPool>,
}

impl MailboxManager {
    /// Create a new mailbox manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Send a message to another user
    ///
    /// # Errors
    ///
    /// * `MailboxError::InvalidInput` - Empty body, body over the length
    ///   limit, or sender addressing themselves
    pub async fn send_message(
        &self,
        sender_id: UserId,
        request: SendMessageRequest,
    ) -> MailboxResult<Message> {
        let body = request.body.trim();
        if body.is_empty() {
            return Err(MailboxError::InvalidInput(
                "Message body cannot be empty".to_string(),
            ));
        }
        if body.chars().count() > MAX_BODY_LENGTH {
            return Err(MailboxError::InvalidInput(format!(
                "Message body cannot exceed {MAX_BODY_LENGTH} characters"
            )));
        }
        if request.recipient_id == sender_id {
            return Err(MailboxError::InvalidInput(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, recipient_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, sender_id, recipient_id, body, is_read, created_at
            "#,
        )
        .bind(sender_id)
        .bind(request.recipient_id)
        .bind(body)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::message_from_row(&row))
    }

    /// List messages received by a user, newest first
    pub async fn list_inbox(&self, user_id: UserId) -> MailboxResult<Vec<Message>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, recipient_id, body, is_read, created_at
            FROM messages
            WHERE recipient_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(Self::message_from_row).collect())
    }

    /// List messages sent by a user, newest first
    pub async fn list_sent(&self, user_id: UserId) -> MailboxResult<Vec<Message>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, recipient_id, body, is_read, created_at
            FROM messages
            WHERE sender_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(Self::message_from_row).collect())
    }

    /// Mark a message as read
    ///
    /// Only the recipient may mark a message as read. Marking a message that
    /// is already read is a no-op.
    ///
    /// # Errors
    ///
    /// * `MailboxError::MessageNotFound` - No message with this id
    /// * `MailboxError::Unauthorized` - Requester is not the recipient
    pub async fn mark_read(
        &self,
        requester_id: UserId,
        message_id: MessageId,
    ) -> MailboxResult<Message> {
        let row = sqlx::query(
            "SELECT id, sender_id, recipient_id, body, is_read, created_at
             FROM messages WHERE id = $1",
        )
        .bind(message_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(MailboxError::MessageNotFound(message_id))?;

        let mut message = Self::message_from_row(&row);
        if message.recipient_id != requester_id {
            return Err(MailboxError::Unauthorized);
        }

        if !message.is_read {
            sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
                .bind(message_id)
                .execute(self.pool.as_ref())
                .await?;
            message.is_read = true;
        }

        Ok(message)
    }

    /// Count unread messages in a user's inbox
    pub async fn unread_count(&self, user_id: UserId) -> MailboxResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS unread FROM messages
             WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.get("unread"))
    }

    fn message_from_row(row: &PgRow) -> Message {
        Message {
            id: row.get("id"),
            sender_id: row.get("sender_id"),
            recipient_id: row.get("recipient_id"),
            body: row.get("body"),
            is_read: row.get("is_read"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}
