//! Love log data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserId;

/// Love log entry identifier type
pub type EntryId = i64;

/// Maximum length of an entry note in characters
pub const MAX_NOTE_LENGTH: usize = 1000;

/// Mood attached to a love log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Loved,
    Happy,
    Okay,
    Sad,
    Grumpy,
}

impl Mood {
    /// String form used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Loved => "loved",
            Mood::Happy => "happy",
            Mood::Okay => "okay",
            Mood::Sad => "sad",
            Mood::Grumpy => "grumpy",
        }
    }

    /// Parse a mood from its stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "loved" => Some(Mood::Loved),
            "happy" => Some(Mood::Happy),
            "okay" => Some(Mood::Okay),
            "sad" => Some(Mood::Sad),
            "grumpy" => Some(Mood::Grumpy),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single mood journal entry
#[derive(Debug, Clone, Serialize)]
pub struct LoveLogEntry {
    pub id: EntryId,
    pub author_id: UserId,
    pub mood: Mood,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Request to record a new entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    pub mood: Mood,
    pub note: String,
}
