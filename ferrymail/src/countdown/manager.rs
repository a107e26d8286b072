//! Countdown manager implementation.

use std::sync::Arc;

use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::auth::UserId;

use super::{
    errors::{CountdownError, CountdownResult},
    models::{Countdown, CountdownId, CountdownView, CreateCountdownRequest, MAX_TITLE_LENGTH},
};

/// Countdown manager
#[derive(Clone)]
pub struct CountdownManager {
    pool: Arc<PgPool>,
}

impl CountdownManager {
    /// Create a new countdown manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new countdown
    ///
    /// # Errors
    ///
    /// * `CountdownError::InvalidInput` - Empty title, title over the length
    ///   limit, or `target_at` not in the future
    pub async fn create_countdown(
        &self,
        creator_id: UserId,
        request: CreateCountdownRequest,
    ) -> CountdownResult<Countdown> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(CountdownError::InvalidInput(
                "Title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(CountdownError::InvalidInput(format!(
                "Title cannot exceed {MAX_TITLE_LENGTH} characters"
            )));
        }
        if request.target_at <= Utc::now() {
            return Err(CountdownError::InvalidInput(
                "Target time must be in the future".to_string(),
            ));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO countdowns (creator_id, title, target_at)
            VALUES ($1, $2, $3)
            RETURNING id, creator_id, title, target_at, created_at
            "#,
        )
        .bind(creator_id)
        .bind(title)
        .bind(request.target_at.naive_utc())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::countdown_from_row(&row))
    }

    /// List all countdowns, soonest target first
    ///
    /// Both users see every countdown. Remaining time is computed at call
    /// time and clamped to zero for countdowns whose moment has passed.
    pub async fn list_countdowns(&self) -> CountdownResult<Vec<CountdownView>> {
        let rows = sqlx::query(
            r#"
            SELECT id, creator_id, title, target_at, created_at
            FROM countdowns
            ORDER BY target_at ASC, id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        let now = Utc::now();
        Ok(rows
            .iter()
            .map(|row| Self::countdown_from_row(row).view_at(now))
            .collect())
    }

    /// Delete a countdown
    ///
    /// Only the creator may delete their countdown.
    ///
    /// # Errors
    ///
    /// * `CountdownError::CountdownNotFound` - No countdown with this id
    /// * `CountdownError::Unauthorized` - Requester is not the creator
    pub async fn delete_countdown(
        &self,
        requester_id: UserId,
        countdown_id: CountdownId,
    ) -> CountdownResult<()> {
        let row = sqlx::query("SELECT creator_id FROM countdowns WHERE id = $1")
            .bind(countdown_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(CountdownError::CountdownNotFound(countdown_id))?;

        let creator_id: UserId = row.get("creator_id");
        if creator_id != requester_id {
            return Err(CountdownError::Unauthorized);
        }

        sqlx::query("DELETE FROM countdowns WHERE id = $1")
            .bind(countdown_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    fn countdown_from_row(row: &PgRow) -> Countdown {
        Countdown {
            id: row.get("id"),
            creator_id: row.get("creator_id"),
            title: row.get("title"),
            target_at: row.get::<chrono::NaiveDateTime, _>("target_at").and_utc(),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}
