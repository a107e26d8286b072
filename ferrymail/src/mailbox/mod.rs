//! Mailbox module providing private messages between the two users.
//!
//! Messages are append-only: a message can be marked as read by its
//! recipient, but never edited or deleted.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{MailboxError, MailboxResult};
pub use manager::MailboxManager;
pub use models::{MAX_BODY_LENGTH, Message, MessageId, SendMessageRequest, UnreadCount};
