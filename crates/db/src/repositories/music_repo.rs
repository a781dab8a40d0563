//! Repository for the `music` table.

use gallery_core::media::NewMusic;
use gallery_core::types::EntityId;
use sqlx::PgPool;

use crate::models::music::MusicRow;

const COLUMNS: &str = "id, character_id, platform, embed_url, title, verified_owner";

pub struct MusicRepo;

impl MusicRepo {
    pub async fn create(pool: &PgPool, input: &NewMusic) -> Result<MusicRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO music (id, character_id, platform, embed_url, title, verified_owner)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MusicRow>(&query)
            .bind(input.id)
            .bind(input.character_id)
            .bind(input.platform.as_str())
            .bind(&input.embed_url)
            .bind(&input.title)
            .bind(input.verified_owner)
            .fetch_one(pool)
            .await
    }

    /// Tracks of every character in `character_ids`, oldest first per character.
    pub async fn list_by_characters(
        pool: &PgPool,
        character_ids: &[EntityId],
    ) -> Result<Vec<MusicRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM music
             WHERE character_id = ANY($1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, MusicRow>(&query)
            .bind(character_ids)
            .fetch_all(pool)
            .await
    }
}
