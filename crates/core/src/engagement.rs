//! Append-only engagement events (view / play / download).
//!
//! Engagement is analytics, not workflow: a failed write is logged and
//! swallowed so it never disturbs the user action that triggered it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ports::EntityStore;
use crate::types::{new_entity_id, EntityId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementAction {
    View,
    Play,
    Download,
}

impl EngagementAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Play => "play",
            Self::Download => "download",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "view" => Ok(Self::View),
            "play" => Ok(Self::Play),
            "download" => Ok(Self::Download),
            other => Err(CoreError::Validation(format!(
                "Unknown engagement action '{other}'. Must be one of: view, play, download"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub id: EntityId,
    pub character_id: EntityId,
    pub action: EngagementAction,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewEngagement {
    pub id: EntityId,
    pub character_id: EntityId,
    pub action: EngagementAction,
    pub created_at: Timestamp,
}

impl NewEngagement {
    pub fn now(character_id: EntityId, action: EngagementAction) -> Self {
        Self {
            id: new_entity_id(),
            character_id,
            action,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn into_engagement(self) -> Engagement {
        Engagement {
            id: self.id,
            character_id: self.character_id,
            action: self.action,
            created_at: self.created_at,
        }
    }
}

/// Fire-and-forget engagement recorder.
pub struct EngagementTracker {
    store: Arc<dyn EntityStore>,
}

impl EngagementTracker {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Record `action` against `character_id`.
    ///
    /// Returns `false` if the write failed; the failure is logged at warn.
    pub async fn track(&self, character_id: EntityId, action: EngagementAction) -> bool {
        match self
            .store
            .record_engagement(&NewEngagement::now(character_id, action))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    %character_id,
                    action = action.as_str(),
                    error = %e,
                    "Engagement insert failed"
                );
                false
            }
        }
    }
}
