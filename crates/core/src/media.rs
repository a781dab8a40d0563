//! Image assets and music tracks attached to a character.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Asset kind. Only still images exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Image,
}

impl AssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "image" => Ok(Self::Image),
            other => Err(CoreError::Validation(format!(
                "Unknown asset type '{other}'"
            ))),
        }
    }
}

/// An image attached to a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: EntityId,
    pub character_id: EntityId,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub original_url: String,
    /// Equal to `original_url` while no thumbnail pipeline exists.
    pub thumbnail_url: String,
    pub prompt_summary: Option<String>,
    pub downloadable: bool,
}

/// Insert payload for an asset row.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub id: EntityId,
    pub character_id: EntityId,
    pub asset_type: AssetType,
    pub original_url: String,
    pub thumbnail_url: String,
    pub prompt_summary: Option<String>,
    pub downloadable: bool,
}

impl NewAsset {
    pub fn into_asset(self) -> Asset {
        Asset {
            id: self.id,
            character_id: self.character_id,
            asset_type: self.asset_type,
            original_url: self.original_url,
            thumbnail_url: self.thumbnail_url,
            prompt_summary: self.prompt_summary,
            downloadable: self.downloadable,
        }
    }
}

// ---------------------------------------------------------------------------
// Music
// ---------------------------------------------------------------------------

/// Hosting platform of a music track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicPlatform {
    #[default]
    Suno,
    Youtube,
    Soundcloud,
    Custom,
}

impl MusicPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suno => "suno",
            Self::Youtube => "youtube",
            Self::Soundcloud => "soundcloud",
            Self::Custom => "custom",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "suno" => Ok(Self::Suno),
            "youtube" => Ok(Self::Youtube),
            "soundcloud" => Ok(Self::Soundcloud),
            "custom" => Ok(Self::Custom),
            other => Err(CoreError::Validation(format!(
                "Unknown music platform '{other}'. Must be one of: suno, youtube, soundcloud, custom"
            ))),
        }
    }
}

/// An audio track attached to a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub id: EntityId,
    pub character_id: EntityId,
    pub platform: MusicPlatform,
    pub embed_url: String,
    pub title: Option<String>,
    /// Only a trusted process sets this; submissions always store `false`.
    pub verified_owner: bool,
}

/// Insert payload for a music row.
#[derive(Debug, Clone)]
pub struct NewMusic {
    pub id: EntityId,
    pub character_id: EntityId,
    pub platform: MusicPlatform,
    pub embed_url: String,
    pub title: Option<String>,
    pub verified_owner: bool,
}

impl NewMusic {
    pub fn into_music(self) -> Music {
        Music {
            id: self.id,
            character_id: self.character_id,
            platform: self.platform,
            embed_url: self.embed_url,
            title: self.title,
            verified_owner: self.verified_owner,
        }
    }
}
