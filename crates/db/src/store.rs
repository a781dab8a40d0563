//! PostgreSQL implementation of the core [`EntityStore`] port.

use std::collections::HashMap;

use async_trait::async_trait;
use gallery_core::character::{
    Character, CharacterDetail, CharacterQuery, NewCharacter, NewUser, UserSummary,
};
use gallery_core::engagement::{Engagement, NewEngagement};
use gallery_core::error::CoreError;
use gallery_core::media::{Asset, Music, NewAsset, NewMusic};
use gallery_core::ports::EntityStore;
use gallery_core::status::CharacterStatus;
use gallery_core::tag::Tag;
use gallery_core::types::{EntityId, Timestamp};

use crate::models::character::CharacterRow;
use crate::repositories::{
    AssetRepo, CharacterRepo, EngagementRepo, MusicRepo, TagRepo, UserRepo,
};
use crate::DbPool;

pub struct PgEntityStore {
    pool: DbPool,
}

impl PgEntityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load owners, assets, music and tags for `rows` with one query each.
    async fn hydrate(&self, rows: Vec<CharacterRow>) -> Result<Vec<CharacterDetail>, CoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<EntityId> = rows.iter().map(|r| r.id).collect();
        let mut owner_ids: Vec<EntityId> = rows.iter().map(|r| r.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<EntityId, UserSummary> = UserRepo::list_by_ids(&self.pool, &owner_ids)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        let mut assets: HashMap<EntityId, Vec<Asset>> = HashMap::new();
        for row in AssetRepo::list_by_characters(&self.pool, &ids)
            .await
            .map_err(persistence)?
        {
            let asset = row.into_asset()?;
            assets.entry(asset.character_id).or_default().push(asset);
        }

        let mut music: HashMap<EntityId, Vec<Music>> = HashMap::new();
        for row in MusicRepo::list_by_characters(&self.pool, &ids)
            .await
            .map_err(persistence)?
        {
            let track = row.into_music()?;
            music.entry(track.character_id).or_default().push(track);
        }

        let mut tags: HashMap<EntityId, Vec<Tag>> = HashMap::new();
        for row in TagRepo::list_by_characters(&self.pool, &ids)
            .await
            .map_err(persistence)?
        {
            tags.entry(row.character_id).or_default().push(row.tag.into());
        }

        rows.into_iter()
            .map(|row| {
                let character = row.into_character()?;
                let id = character.id;
                Ok(CharacterDetail {
                    owner: owners.get(&character.owner_id).cloned(),
                    character,
                    assets: assets.remove(&id).unwrap_or_default(),
                    music: music.remove(&id).unwrap_or_default(),
                    tags: tags.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Map a sqlx error to a domain error, logging the cause.
fn persistence(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {}",
                db_err.constraint().unwrap_or("unknown")
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Persistence(err.to_string())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn ensure_user(&self, user: &NewUser) -> Result<(), CoreError> {
        UserRepo::ensure(&self.pool, user)
            .await
            .map_err(persistence)
    }

    async fn create_character(&self, input: &NewCharacter) -> Result<Character, CoreError> {
        CharacterRepo::create(&self.pool, input)
            .await
            .map_err(persistence)?
            .into_character()
    }

    async fn create_asset(&self, input: &NewAsset) -> Result<Asset, CoreError> {
        AssetRepo::create(&self.pool, input)
            .await
            .map_err(persistence)?
            .into_asset()
    }

    async fn create_music(&self, input: &NewMusic) -> Result<Music, CoreError> {
        MusicRepo::create(&self.pool, input)
            .await
            .map_err(persistence)?
            .into_music()
    }

    async fn find_character(&self, id: EntityId) -> Result<Option<CharacterDetail>, CoreError> {
        let Some(row) = CharacterRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    async fn list_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<Vec<CharacterDetail>, CoreError> {
        let rows = CharacterRepo::list_by_status(&self.pool, query.status.as_str(), query.has_music)
            .await
            .map_err(persistence)?;
        self.hydrate(rows).await
    }

    async fn transition_status(
        &self,
        id: EntityId,
        from: CharacterStatus,
        to: CharacterStatus,
    ) -> Result<Option<Character>, CoreError> {
        CharacterRepo::transition_status(&self.pool, id, from.as_str(), to.as_str())
            .await
            .map_err(persistence)?
            .map(CharacterRow::into_character)
            .transpose()
    }

    async fn list_orphaned_pending(&self, cutoff: Timestamp) -> Result<Vec<EntityId>, CoreError> {
        CharacterRepo::list_orphaned_pending(&self.pool, cutoff)
            .await
            .map_err(persistence)
    }

    async fn delete_orphaned_pending(&self, id: EntityId) -> Result<bool, CoreError> {
        CharacterRepo::delete_orphaned_pending(&self.pool, id)
            .await
            .map_err(persistence)
    }

    async fn record_engagement(&self, input: &NewEngagement) -> Result<Engagement, CoreError> {
        match EngagementRepo::create(&self.pool, input).await {
            Ok(row) => row.into_engagement(),
            Err(e) if is_foreign_key_violation(&e) => Err(CoreError::NotFound {
                entity: "Character",
                id: input.character_id,
            }),
            Err(e) => Err(persistence(e)),
        }
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CoreError> {
        Ok(TagRepo::list_all(&self.pool)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(Tag::from)
            .collect())
    }
}
