//! Character row model.

use gallery_core::character::Character;
use gallery_core::error::CoreError;
use gallery_core::status::CharacterStatus;
use gallery_core::types::{EntityId, Timestamp};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRow {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub short_worldview: String,
    pub description: Option<String>,
    pub has_music: bool,
    pub ai_tool_used: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
}

impl CharacterRow {
    pub fn into_character(self) -> Result<Character, CoreError> {
        Ok(Character {
            id: self.id,
            owner_id: self.user_id,
            name: self.name,
            short_worldview: self.short_worldview,
            description: self.description,
            has_music: self.has_music,
            ai_tool_used: self.ai_tool_used,
            status: CharacterStatus::from_name(&self.status)?,
            created_at: self.created_at,
        })
    }
}
