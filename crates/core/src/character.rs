//! Character entity, its hydrated view, and the owning user summary.

use serde::{Deserialize, Serialize};

use crate::media::{Asset, Music};
use crate::session::SessionUser;
use crate::status::CharacterStatus;
use crate::tag::Tag;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A moderated gallery entry.
///
/// `id`, `owner_id`, `has_music` and `created_at` are fixed at creation.
/// Only `status` changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub name: String,
    pub short_worldview: String,
    pub description: Option<String>,
    pub has_music: bool,
    pub ai_tool_used: Option<String>,
    pub status: CharacterStatus,
    pub created_at: Timestamp,
}

/// Public profile of the user that owns a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: EntityId,
    pub name: String,
    pub handle: String,
    pub avatar_url: Option<String>,
}

/// Insert payload for the user row behind a signed-in submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: EntityId,
    pub name: String,
    pub handle: String,
    pub role: String,
}

impl NewUser {
    /// Placeholder profile for a session user seen for the first time.
    ///
    /// The handle is derived from the id so it never collides.
    pub fn for_session(session: &SessionUser) -> Self {
        Self {
            id: session.user_id,
            name: "Member".into(),
            handle: format!("user_{}", session.user_id.simple()),
            role: session.role.clone(),
        }
    }

    pub fn into_summary(self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name,
            handle: self.handle,
            avatar_url: None,
        }
    }
}

/// A character together with its owner and related rows, as read in one go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: Character,
    pub owner: Option<UserSummary>,
    pub assets: Vec<Asset>,
    pub music: Vec<Music>,
    pub tags: Vec<Tag>,
}

impl CharacterDetail {
    pub fn id(&self) -> EntityId {
        self.character.id
    }
}

// ---------------------------------------------------------------------------
// Inserts and filters
// ---------------------------------------------------------------------------

/// Insert payload for a character row. Status is always `pending`.
#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub name: String,
    pub short_worldview: String,
    pub description: Option<String>,
    pub has_music: bool,
    pub ai_tool_used: Option<String>,
    pub created_at: Timestamp,
}

impl NewCharacter {
    /// The row as it will read back once persisted.
    pub fn into_character(self) -> Character {
        Character {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            short_worldview: self.short_worldview,
            description: self.description,
            has_music: self.has_music,
            ai_tool_used: self.ai_tool_used,
            status: CharacterStatus::Pending,
            created_at: self.created_at,
        }
    }
}

/// Equality filter for character listings. Results are ordered by
/// `created_at` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterQuery {
    pub status: CharacterStatus,
    pub has_music: Option<bool>,
}

impl CharacterQuery {
    pub fn with_status(status: CharacterStatus) -> Self {
        Self {
            status,
            has_music: None,
        }
    }

    pub fn has_music(mut self, has_music: bool) -> Self {
        self.has_music = Some(has_music);
        self
    }

    pub fn matches(&self, character: &Character) -> bool {
        character.status == self.status
            && self.has_music.map_or(true, |flag| character.has_music == flag)
    }
}
