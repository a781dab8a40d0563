//! Engagement row model.

use gallery_core::engagement::{Engagement, EngagementAction};
use gallery_core::error::CoreError;
use gallery_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the append-only `engagement` table.
#[derive(Debug, Clone, FromRow)]
pub struct EngagementRow {
    pub id: EntityId,
    pub character_id: EntityId,
    pub action: String,
    pub created_at: Timestamp,
}

impl EngagementRow {
    pub fn into_engagement(self) -> Result<Engagement, CoreError> {
        Ok(Engagement {
            id: self.id,
            character_id: self.character_id,
            action: EngagementAction::from_name(&self.action)?,
            created_at: self.created_at,
        })
    }
}
