//! Repository for the append-only `engagement` table.

use gallery_core::engagement::NewEngagement;
use sqlx::PgPool;

use crate::models::engagement::EngagementRow;

pub struct EngagementRepo;

impl EngagementRepo {
    pub async fn create(pool: &PgPool, input: &NewEngagement) -> Result<EngagementRow, sqlx::Error> {
        sqlx::query_as::<_, EngagementRow>(
            "INSERT INTO engagement (id, character_id, action, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, character_id, action, created_at",
        )
        .bind(input.id)
        .bind(input.character_id)
        .bind(input.action.as_str())
        .bind(input.created_at)
        .fetch_one(pool)
        .await
    }
}
