//! In-process [`EntityStore`] used for mock mode and tests.
//!
//! Mirrors the PostgreSQL store's contract: same ordering, same conditional
//! status transition, cascading delete of related rows.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::character::{
    Character, CharacterDetail, CharacterQuery, NewCharacter, NewUser, UserSummary,
};
use crate::engagement::{Engagement, NewEngagement};
use crate::error::CoreError;
use crate::media::{Asset, Music, NewAsset, NewMusic};
use crate::ports::EntityStore;
use crate::roles::ANONYMOUS_USER_ID;
use crate::status::CharacterStatus;
use crate::tag::Tag;
use crate::types::{EntityId, Timestamp};

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    EnsureUser,
    CreateCharacter,
    CreateAsset,
    CreateMusic,
    TransitionStatus,
    RecordEngagement,
}

#[derive(Default)]
struct Tables {
    characters: Vec<Character>,
    assets: Vec<Asset>,
    music: Vec<Music>,
    tags: Vec<Tag>,
    character_tags: Vec<(EntityId, EntityId)>,
    users: HashMap<EntityId, UserSummary>,
    engagements: Vec<Engagement>,
    failing: HashSet<StoreOp>,
}

impl Tables {
    fn check(&self, op: StoreOp) -> Result<(), CoreError> {
        if self.failing.contains(&op) {
            return Err(CoreError::Persistence(format!("{op:?} unavailable")));
        }
        Ok(())
    }

    fn hydrate(&self, character: &Character) -> CharacterDetail {
        let tag_ids: Vec<EntityId> = self
            .character_tags
            .iter()
            .filter(|(cid, _)| *cid == character.id)
            .map(|(_, tid)| *tid)
            .collect();

        CharacterDetail {
            character: character.clone(),
            owner: self.users.get(&character.owner_id).cloned(),
            assets: self
                .assets
                .iter()
                .filter(|a| a.character_id == character.id)
                .cloned()
                .collect(),
            music: self
                .music
                .iter()
                .filter(|m| m.character_id == character.id)
                .cloned()
                .collect(),
            tags: self
                .tags
                .iter()
                .filter(|t| tag_ids.contains(&t.id))
                .cloned()
                .collect(),
        }
    }

    fn character_exists(&self, id: EntityId) -> bool {
        self.characters.iter().any(|c| c.id == id)
    }

    fn has_asset(&self, character_id: EntityId) -> bool {
        self.assets.iter().any(|a| a.character_id == character_id)
    }
}

/// Thread-safe in-memory entity store.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// An empty store containing only the anonymous placeholder user.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        tables.users.insert(
            ANONYMOUS_USER_ID,
            UserSummary {
                id: ANONYMOUS_USER_ID,
                name: "Anonymous".into(),
                handle: "anonymous".into(),
                avatar_url: None,
            },
        );
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub async fn insert_user(&self, user: UserSummary) {
        self.tables.write().await.users.insert(user.id, user);
    }

    pub async fn insert_tag(&self, tag: Tag) {
        let mut tables = self.tables.write().await;
        tables.tags.push(tag);
        tables.tags.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Associate an existing tag with an existing character.
    pub async fn attach_tag(&self, character_id: EntityId, tag_id: EntityId) -> Result<(), CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.character_exists(character_id) {
            return Err(CoreError::NotFound {
                entity: "Character",
                id: character_id,
            });
        }
        if !tables.tags.iter().any(|t| t.id == tag_id) {
            return Err(CoreError::NotFound {
                entity: "Tag",
                id: tag_id,
            });
        }
        if !tables.character_tags.contains(&(character_id, tag_id)) {
            tables.character_tags.push((character_id, tag_id));
        }
        Ok(())
    }

    /// Make every subsequent `op` fail with a persistence error.
    pub async fn fail_on(&self, op: StoreOp) {
        self.tables.write().await.failing.insert(op);
    }

    pub async fn recover(&self, op: StoreOp) {
        self.tables.write().await.failing.remove(&op);
    }

    pub async fn character_count(&self) -> usize {
        self.tables.read().await.characters.len()
    }

    pub async fn engagements(&self) -> Vec<Engagement> {
        self.tables.read().await.engagements.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn ensure_user(&self, user: &NewUser) -> Result<(), CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::EnsureUser)?;
        tables
            .users
            .entry(user.id)
            .or_insert_with(|| user.clone().into_summary());
        Ok(())
    }

    async fn create_character(&self, input: &NewCharacter) -> Result<Character, CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::CreateCharacter)?;
        if tables.character_exists(input.id) {
            return Err(CoreError::Conflict(format!(
                "Character {} already exists",
                input.id
            )));
        }
        let character = input.clone().into_character();
        tables.characters.push(character.clone());
        Ok(character)
    }

    async fn create_asset(&self, input: &NewAsset) -> Result<Asset, CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::CreateAsset)?;
        if !tables.character_exists(input.character_id) {
            return Err(CoreError::Persistence(format!(
                "Asset references missing character {}",
                input.character_id
            )));
        }
        let asset = input.clone().into_asset();
        tables.assets.push(asset.clone());
        Ok(asset)
    }

    async fn create_music(&self, input: &NewMusic) -> Result<Music, CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::CreateMusic)?;
        if !tables.character_exists(input.character_id) {
            return Err(CoreError::Persistence(format!(
                "Music references missing character {}",
                input.character_id
            )));
        }
        let music = input.clone().into_music();
        tables.music.push(music.clone());
        Ok(music)
    }

    async fn find_character(&self, id: EntityId) -> Result<Option<CharacterDetail>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .characters
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.hydrate(c)))
    }

    async fn list_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<Vec<CharacterDetail>, CoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Character> = tables
            .characters
            .iter()
            .filter(|c| query.matches(c))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matching.into_iter().map(|c| tables.hydrate(c)).collect())
    }

    async fn transition_status(
        &self,
        id: EntityId,
        from: CharacterStatus,
        to: CharacterStatus,
    ) -> Result<Option<Character>, CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::TransitionStatus)?;
        Ok(tables
            .characters
            .iter_mut()
            .find(|c| c.id == id && c.status == from)
            .map(|c| {
                c.status = to;
                c.clone()
            }))
    }

    async fn list_orphaned_pending(&self, cutoff: Timestamp) -> Result<Vec<EntityId>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .characters
            .iter()
            .filter(|c| c.status == CharacterStatus::Pending && c.created_at <= cutoff)
            .filter(|c| !tables.has_asset(c.id))
            .map(|c| c.id)
            .collect())
    }

    async fn delete_orphaned_pending(&self, id: EntityId) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        let orphaned = tables
            .characters
            .iter()
            .any(|c| c.id == id && c.status == CharacterStatus::Pending)
            && !tables.has_asset(id);
        if !orphaned {
            return Ok(false);
        }
        tables.characters.retain(|c| c.id != id);
        tables.assets.retain(|a| a.character_id != id);
        tables.music.retain(|m| m.character_id != id);
        tables.character_tags.retain(|(cid, _)| *cid != id);
        tables.engagements.retain(|e| e.character_id != id);
        Ok(true)
    }

    async fn record_engagement(&self, input: &NewEngagement) -> Result<Engagement, CoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::RecordEngagement)?;
        if !tables.character_exists(input.character_id) {
            return Err(CoreError::NotFound {
                entity: "Character",
                id: input.character_id,
            });
        }
        let engagement = input.clone().into_engagement();
        tables.engagements.push(engagement.clone());
        Ok(engagement)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CoreError> {
        Ok(self.tables.read().await.tags.clone())
    }
}
