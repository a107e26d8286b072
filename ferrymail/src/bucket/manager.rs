//! Bucket list manager implementation.

use std::sync::Arc;

use sqlx::{PgPool, Row, postgres::PgRow};

use crate::auth::UserId;

use super::{
    errors::{BucketError, BucketResult},
    models::{AddBucketItemRequest, BucketItem, BucketItemId, MAX_NOTES_LENGTH, MAX_TITLE_LENGTH},
};

/// Bucket list manager
#[derive(Clone)]
pub struct BucketManager {
    pool: Arc<PgPool>,
}

impl BucketManager {
    /// Create a new bucket list manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Add a new item to the shared bucket list
    ///
    /// # Errors
    ///
    /// * `BucketError::InvalidInput` - Empty title or fields over the length limits
    pub async fn add_item(
        &self,
        creator_id: UserId,
        request: AddBucketItemRequest,
    ) -> BucketResult<BucketItem> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(BucketError::InvalidInput(
                "Title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(BucketError::InvalidInput(format!(
                "Title cannot exceed {MAX_TITLE_LENGTH} characters"
            )));
        }

        let notes = match request.notes.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(notes) if notes.chars().count() > MAX_NOTES_LENGTH => {
                return Err(BucketError::InvalidInput(format!(
                    "Notes cannot exceed {MAX_NOTES_LENGTH} characters"
                )));
            }
            Some(notes) => Some(notes),
        };

        let row = sqlx::query(
            r#"
            INSERT INTO bucket_items (creator_id, title, notes)
            VALUES ($1, $2, $3)
            RETURNING id, creator_id, title, notes, completed_at, created_at
            "#,
        )
        .bind(creator_id)
        .bind(title)
        .bind(notes)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::item_from_row(&row))
    }

    /// List all bucket items, open items first, then newest first
    pub async fn list_items(&self) -> BucketResult<Vec<BucketItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, creator_id, title, notes, completed_at, created_at
            FROM bucket_items
            ORDER BY (completed_at IS NOT NULL) ASC, created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(Self::item_from_row).collect())
    }

    /// Mark an item as completed
    ///
    /// Either user may complete any item. The completion timestamp is set
    /// server-side.
    ///
    /// # Errors
    ///
    /// * `BucketError::ItemNotFound` - No item with this id
    /// * `BucketError::InvalidState` - Item already completed
    pub async fn complete_item(&self, item_id: BucketItemId) -> BucketResult<BucketItem> {
        let item = self.get_item(item_id).await?;
        if item.is_completed() {
            return Err(BucketError::InvalidState);
        }

        let row = sqlx::query(
            r#"
            UPDATE bucket_items SET completed_at = NOW()
            WHERE id = $1
            RETURNING id, creator_id, title, notes, completed_at, created_at
            "#,
        )
        .bind(item_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::item_from_row(&row))
    }

    /// Reopen a completed item
    ///
    /// Either user may reopen any item; the completion timestamp is cleared.
    ///
    /// # Errors
    ///
    /// * `BucketError::ItemNotFound` - No item with this id
    /// * `BucketError::InvalidState` - Item is not completed
    pub async fn reopen_item(&self, item_id: BucketItemId) -> BucketResult<BucketItem> {
        let item = self.get_item(item_id).await?;
        if !item.is_completed() {
            return Err(BucketError::InvalidState);
        }

        let row = sqlx::query(
            r#"
            UPDATE bucket_items SET completed_at = NULL
            WHERE id = $1
            RETURNING id, creator_id, title, notes, completed_at, created_at
            "#,
        )
        .bind(item_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::item_from_row(&row))
    }

    /// Delete an item
    ///
    /// Only the creator may delete their item.
    ///
    /// # Errors
    ///
    /// * `BucketError::ItemNotFound` - No item with this id
    /// * `BucketError::Unauthorized` - Requester is not the creator
    pub async fn delete_item(
        &self,
        requester_id: UserId,
        item_id: BucketItemId,
    ) -> BucketResult<()> {
        let item = self.get_item(item_id).await?;
        if item.creator_id != requester_id {
            return Err(BucketError::Unauthorized);
        }

        sqlx::query("DELETE FROM bucket_items WHERE id = $1")
            .bind(item_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn get_item(&self, item_id: BucketItemId) -> BucketResult<BucketItem> {
        let row = sqlx::query(
            "SELECT id, creator_id, title, notes, completed_at, created_at
             FROM bucket_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(BucketError::ItemNotFound(item_id))?;

        Ok(Self::item_from_row(&row))
    }

    fn item_from_row(row: &PgRow) -> BucketItem {
        BucketItem {
            id: row.get("id"),
            creator_id: row.get("creator_id"),
            title: row.get("title"),
            notes: row.get("notes"),
            completed_at: row
                .get::<Option<chrono::NaiveDateTime>, _>("completed_at")
                .map(|dt| dt.and_utc()),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }
    }
}
