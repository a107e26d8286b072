//! Love log manager implementation.

use std::sync::Arc;

use sqlx::{PgPool, Row, postgres::PgRow};

use crate::auth::UserId;

use super::{
    errors::{LoveLogError, LoveLogResult},
    models::{CreateEntryRequest, EntryId, LoveLogEntry, MAX_NOTE_LENGTH, Mood},
};

/// Love log manager
#[derive(Clone)]
pub struct LoveLogManager {
    pool: Arc<PgPool>,
}

impl LoveLogManager {
    /// Create a new love log manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Record a new entry
    ///
    /// # Errors
    ///
    /// * `LoveLogError::InvalidInput` - Empty note or note over the length limit
    pub async fn create_entry(
        &self,
        author_id: UserId,
        request: CreateEntryRequest,
    ) -> LoveLogResult<LoveLogEntry> {
        let note = request.note.trim();
        if note.is_empty() {
            return Err(LoveLogError::InvalidInput(
                "Note cannot be empty".to_string(),
            ));
        }
        if note.chars().count() > MAX_NOTE_LENGTH {
            return Err(LoveLogError::InvalidInput(format!(
                "Note cannot exceed {MAX_NOTE_LENGTH} characters"
            )));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO love_log_entries (author_id, mood, note)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, mood, note, created_at
            "#,
        )
        .bind(author_id)
        .bind(request.mood.as_str())
        .bind(note)
        .fetch_one(self.pool.as_ref())
        .await?;

        Self::entry_from_row(&row)
    }

    /// List all entries from both users, newest first
    pub async fn list_entries(&self) -> LoveLogResult<Vec<LoveLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_id, mood, note, created_at
            FROM love_log_entries
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    /// Delete an entry
    ///
    /// Only the author may delete their entry.
    ///
    /// # Errors
    ///
    /// * `LoveLogError::EntryNotFound` - No entry with this id
    /// * `LoveLogError::Unauthorized` - Requester is not the author
    pub async fn delete_entry(
        &self,
        requester_id: UserId,
        entry_id: EntryId,
    ) -> LoveLogResult<()> {
        let row = sqlx::query("SELECT author_id FROM love_log_entries WHERE id = $1")
            .bind(entry_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(LoveLogError::EntryNotFound(entry_id))?;

        let author_id: UserId = row.get("author_id");
        if author_id != requester_id {
            return Err(LoveLogError::Unauthorized);
        }

        sqlx::query("DELETE FROM love_log_entries WHERE id = $1")
            .bind(entry_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    fn entry_from_row(row: &PgRow) -> LoveLogResult<LoveLogEntry> {
        let mood_str: String = row.get("mood");
        let mood = Mood::parse(&mood_str).ok_or_else(|| {
            LoveLogError::InternalStateError(format!("unknown mood '{mood_str}'"))
        })?;

        Ok(LoveLogEntry {
            id: row.get("id"),
            author_id: row.get("author_id"),
            mood,
            note: row.get("note"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        })
    }
}
