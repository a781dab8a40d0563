//! Asset row model.

use gallery_core::error::CoreError;
use gallery_core::media::{Asset, AssetType};
use gallery_core::types::EntityId;
use sqlx::FromRow;

/// A row from the `assets` table. `type` is selected as `asset_type`.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub id: EntityId,
    pub character_id: EntityId,
    pub asset_type: String,
    pub original_url: String,
    pub thumbnail_url: String,
    pub prompt_summary: Option<String>,
    pub downloadable: bool,
}

impl AssetRow {
    pub fn into_asset(self) -> Result<Asset, CoreError> {
        Ok(Asset {
            id: self.id,
            character_id: self.character_id,
            asset_type: AssetType::from_name(&self.asset_type)?,
            original_url: self.original_url,
            thumbnail_url: self.thumbnail_url,
            prompt_summary: self.prompt_summary,
            downloadable: self.downloadable,
        })
    }
}
