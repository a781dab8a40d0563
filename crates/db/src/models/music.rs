//! Music row model.

use gallery_core::error::CoreError;
use gallery_core::media::{Music, MusicPlatform};
use gallery_core::types::EntityId;
use sqlx::FromRow;

/// A row from the `music` table.
#[derive(Debug, Clone, FromRow)]
pub struct MusicRow {
    pub id: EntityId,
    pub character_id: EntityId,
    pub platform: String,
    pub embed_url: String,
    pub title: Option<String>,
    pub verified_owner: bool,
}

impl MusicRow {
    pub fn into_music(self) -> Result<Music, CoreError> {
        Ok(Music {
            id: self.id,
            character_id: self.character_id,
            platform: MusicPlatform::from_name(&self.platform)?,
            embed_url: self.embed_url,
            title: self.title,
            verified_owner: self.verified_owner,
        })
    }
}
