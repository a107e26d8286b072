//! Bucket list data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Bucket item identifier type
pub type BucketItemId = i64;

/// Maximum length of a bucket item title in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of the optional notes field in characters
pub const MAX_NOTES_LENGTH: usize = 2000;

/// A shared bucket list item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketItem {
    pub id: BucketItemId,
    pub creator_id: UserId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set when either user completes the item, cleared on reopen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BucketItem {
    /// Whether the item has been completed
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Request to add a new bucket list item
#[derive(Debug, Clone, Deserialize)]
pub struct AddBucketItemRequest {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
}
