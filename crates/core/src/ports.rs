//! Entity store port.
//!
//! The moderation workflow, gallery read path and engagement tracker only
//! talk to persistence through [`EntityStore`]. Two implementations exist:
//! the PostgreSQL store in `gallery-db` and [`crate::memory_store::InMemoryStore`].
//! One of them is chosen at startup and shared as `Arc<dyn EntityStore>`.
//!
//! Row-level access policy is the store's concern, not the caller's.

use async_trait::async_trait;

use crate::character::{Character, CharacterDetail, CharacterQuery, NewCharacter, NewUser};
use crate::engagement::{Engagement, NewEngagement};
use crate::error::CoreError;
use crate::media::{Asset, Music, NewAsset, NewMusic};
use crate::status::CharacterStatus;
use crate::tag::Tag;
use crate::types::{EntityId, Timestamp};

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert `user` unless a user with the same id exists. Existing rows are
    /// left untouched.
    async fn ensure_user(&self, user: &NewUser) -> Result<(), CoreError>;

    /// Insert a character row with status `pending`.
    async fn create_character(&self, input: &NewCharacter) -> Result<Character, CoreError>;

    async fn create_asset(&self, input: &NewAsset) -> Result<Asset, CoreError>;

    async fn create_music(&self, input: &NewMusic) -> Result<Music, CoreError>;

    /// Load one character hydrated with owner, assets, music and tags.
    async fn find_character(&self, id: EntityId) -> Result<Option<CharacterDetail>, CoreError>;

    /// List hydrated characters matching `query`, newest first.
    async fn list_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<Vec<CharacterDetail>, CoreError>;

    /// Move a character from `from` to `to` only if it is currently in `from`.
    ///
    /// Returns `None` when no row matched (missing, or already moved).
    async fn transition_status(
        &self,
        id: EntityId,
        from: CharacterStatus,
        to: CharacterStatus,
    ) -> Result<Option<Character>, CoreError>;

    /// Ids of pending characters created at or before `cutoff` that have no asset.
    async fn list_orphaned_pending(&self, cutoff: Timestamp) -> Result<Vec<EntityId>, CoreError>;

    /// Delete a character that is still pending and still has no asset,
    /// together with its related rows. Returns `true` if removed.
    async fn delete_orphaned_pending(&self, id: EntityId) -> Result<bool, CoreError>;

    /// Append an engagement event.
    async fn record_engagement(&self, input: &NewEngagement) -> Result<Engagement, CoreError>;

    /// All tags, ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CoreError>;
}
