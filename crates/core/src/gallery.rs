//! Public gallery read path.
//!
//! Only approved characters are ever returned. The gallery is split into
//! two disjoint sections by `has_music`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::character::{Character, CharacterDetail, CharacterQuery, UserSummary};
use crate::error::CoreError;
use crate::media::{Asset, Music};
use crate::ports::EntityStore;
use crate::status::CharacterStatus;
use crate::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryPartition {
    WithMusic,
    WithoutMusic,
}

impl GalleryPartition {
    pub fn has_music(self) -> bool {
        matches!(self, Self::WithMusic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WithMusic => "with_music",
            Self::WithoutMusic => "without_music",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "with_music" => Ok(Self::WithMusic),
            "without_music" => Ok(Self::WithoutMusic),
            other => Err(CoreError::Validation(format!(
                "Unknown gallery partition '{other}'. Must be one of: with_music, without_music"
            ))),
        }
    }
}

/// One gallery card: the character with its first asset and first track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryEntry {
    #[serde(flatten)]
    pub character: Character,
    pub owner: Option<UserSummary>,
    pub asset: Option<Asset>,
    pub music: Option<Music>,
    pub tags: Vec<Tag>,
}

impl From<CharacterDetail> for GalleryEntry {
    fn from(detail: CharacterDetail) -> Self {
        Self {
            character: detail.character,
            owner: detail.owner,
            asset: detail.assets.into_iter().next(),
            music: detail.music.into_iter().next(),
            tags: detail.tags,
        }
    }
}

/// Both gallery sections, read from the same store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GallerySections {
    pub with_music: Vec<GalleryEntry>,
    pub without_music: Vec<GalleryEntry>,
}

pub struct GalleryReader {
    store: Arc<dyn EntityStore>,
}

impl GalleryReader {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Approved characters in `partition`, newest first.
    pub async fn list_approved(
        &self,
        partition: GalleryPartition,
    ) -> Result<Vec<GalleryEntry>, CoreError> {
        let query =
            CharacterQuery::with_status(CharacterStatus::Approved).has_music(partition.has_music());
        let details = self.store.list_characters(&query).await?;
        tracing::debug!(
            partition = partition.as_str(),
            count = details.len(),
            "Gallery partition loaded"
        );
        Ok(details.into_iter().map(GalleryEntry::from).collect())
    }

    /// Read both partitions concurrently.
    pub async fn list_sections(&self) -> Result<GallerySections, CoreError> {
        let (with_music, without_music) = tokio::try_join!(
            self.list_approved(GalleryPartition::WithMusic),
            self.list_approved(GalleryPartition::WithoutMusic),
        )?;
        Ok(GallerySections {
            with_music,
            without_music,
        })
    }
}
