//! Countdown data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Countdown identifier type
pub type CountdownId = i64;

/// Maximum length of a countdown title in characters
pub const MAX_TITLE_LENGTH: usize = 120;

/// A countdown towards a shared future moment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    pub id: CountdownId,
    pub creator_id: UserId,
    pub title: String,
    pub target_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A countdown together with its remaining time, as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct CountdownView {
    pub id: CountdownId,
    pub creator_id: UserId,
    pub title: String,
    pub target_at: DateTime<Utc>,
    /// Whole seconds until `target_at`, clamped to zero once reached
    pub seconds_remaining: i64,
    pub created_at: DateTime<Utc>,
}

impl Countdown {
    /// Project this countdown into a client view at the given instant
    pub fn view_at(&self, now: DateTime<Utc>) -> CountdownView {
        CountdownView {
            id: self.id,
            creator_id: self.creator_id,
            title: self.title.clone(),
            target_at: self.target_at,
            seconds_remaining: (self.target_at - now).num_seconds().max(0),
            created_at: self.created_at,
        }
    }
}

/// Request to create a new countdown
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCountdownRequest {
    pub title: String,
    pub target_at: DateTime<Utc>,
}
