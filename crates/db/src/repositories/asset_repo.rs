//! Repository for the `assets` table.

use gallery_core::media::NewAsset;
use gallery_core::types::EntityId;
use sqlx::PgPool;

use crate::models::asset::AssetRow;

const COLUMNS: &str = "id, character_id, type AS asset_type, original_url, thumbnail_url, \
                       prompt_summary, downloadable";

pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(pool: &PgPool, input: &NewAsset) -> Result<AssetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets
                (id, character_id, type, original_url, thumbnail_url, prompt_summary, downloadable)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(input.id)
            .bind(input.character_id)
            .bind(input.asset_type.as_str())
            .bind(&input.original_url)
            .bind(&input.thumbnail_url)
            .bind(&input.prompt_summary)
            .bind(input.downloadable)
            .fetch_one(pool)
            .await
    }

    /// Assets of every character in `character_ids`, oldest first per character.
    pub async fn list_by_characters(
        pool: &PgPool,
        character_ids: &[EntityId],
    ) -> Result<Vec<AssetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE character_id = ANY($1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(character_ids)
            .fetch_all(pool)
            .await
    }
}
