//! Repository for the `characters` table.

use gallery_core::character::NewCharacter;
use gallery_core::status::STATUS_PENDING;
use gallery_core::types::{EntityId, Timestamp};
use sqlx::PgPool;

use crate::models::character::CharacterRow;

/// Column list shared across queries.
const COLUMNS: &str = "id, user_id, name, short_worldview, description, has_music, \
                       ai_tool_used, status, created_at";

pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a character in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewCharacter) -> Result<CharacterRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (id, user_id, name, short_worldview, description, has_music, ai_tool_used, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.short_worldview)
            .bind(&input.description)
            .bind(input.has_music)
            .bind(&input.ai_tool_used)
            .bind(STATUS_PENDING)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List characters in `status`, optionally filtered by `has_music`, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        has_music: Option<bool>,
    ) -> Result<Vec<CharacterRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE status = $1 AND ($2::BOOLEAN IS NULL OR has_music = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(status)
            .bind(has_music)
            .fetch_all(pool)
            .await
    }

    /// Set `status` to `to` only if it currently equals `from`.
    ///
    /// Returns `None` when no row matched.
    pub async fn transition_status(
        pool: &PgPool,
        id: EntityId,
        from: &str,
        to: &str,
    ) -> Result<Option<CharacterRow>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRow>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Ids of pending characters created at or before `cutoff` with no asset row.
    pub async fn list_orphaned_pending(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        sqlx::query_scalar::<_, EntityId>(
            "SELECT c.id FROM characters c
             WHERE c.status = $1
               AND c.created_at <= $2
               AND NOT EXISTS (SELECT 1 FROM assets a WHERE a.character_id = c.id)
             ORDER BY c.created_at",
        )
        .bind(STATUS_PENDING)
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Delete a character only while it is pending and has no asset row.
    /// Music, tags and engagement cascade.
    pub async fn delete_orphaned_pending(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM characters c
             WHERE c.id = $1
               AND c.status = $2
               AND NOT EXISTS (SELECT 1 FROM assets a WHERE a.character_id = c.id)",
        )
        .bind(id)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
