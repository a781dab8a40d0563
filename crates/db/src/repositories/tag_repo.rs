//! Repository for the `tags` and `character_tags` tables.

use gallery_core::types::EntityId;
use sqlx::PgPool;

use crate::models::tag::{CharacterTagRow, TagRow};

pub struct TagRepo;

impl TagRepo {
    /// All tags ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TagRow>, sqlx::Error> {
        sqlx::query_as::<_, TagRow>(
            "SELECT id, name, color, type AS tag_type FROM tags ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Tags attached to any of `character_ids`, ordered by tag name.
    pub async fn list_by_characters(
        pool: &PgPool,
        character_ids: &[EntityId],
    ) -> Result<Vec<CharacterTagRow>, sqlx::Error> {
        sqlx::query_as::<_, CharacterTagRow>(
            "SELECT ct.character_id, t.id, t.name, t.color, t.type AS tag_type
             FROM character_tags ct
             JOIN tags t ON t.id = ct.tag_id
             WHERE ct.character_id = ANY($1)
             ORDER BY t.name",
        )
        .bind(character_ids)
        .fetch_all(pool)
        .await
    }

    /// Attach a tag to a character. Attaching twice is a no-op.
    pub async fn attach(
        pool: &PgPool,
        character_id: EntityId,
        tag_id: EntityId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO character_tags (character_id, tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(character_id)
        .bind(tag_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
