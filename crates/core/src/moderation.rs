//! Submission and moderation of characters.
//!
//! A submission is a strictly sequential pipeline: character row, image
//! upload, prompt upload, asset row, music row. Each step needs the result
//! of the one before, and a failing step stops the pipeline. Earlier rows
//! are not rolled back; [`ModerationWorkflow::sweep_orphans`] removes pending
//! characters that never received an asset.

use std::sync::Arc;

use serde::Serialize;

use crate::character::{Character, CharacterDetail, CharacterQuery, NewCharacter, NewUser};
use crate::error::{CoreError, SubmissionStep};
use crate::media::{AssetType, NewAsset, NewMusic};
use crate::ports::EntityStore;
use crate::session::{owner_for, require_session, SessionUser};
use crate::status::{CharacterStatus, Decision};
use crate::storage::{object_path, Bucket, ObjectStorage};
use crate::submission::{
    compose_prompt_summary, validate_submission, ImageSource, SubmissionInput,
};
use crate::types::{new_entity_id, EntityId};

/// Counts shown on the review dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PendingStats {
    pub total: usize,
    pub with_music: usize,
    pub without_music: usize,
}

pub struct ModerationWorkflow {
    store: Arc<dyn EntityStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl ModerationWorkflow {
    pub fn new(store: Arc<dyn EntityStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    /// Validate and persist a new character in `pending` status.
    ///
    /// Validation errors are returned as-is before any write. Failures after
    /// the first write collapse into [`CoreError::SubmissionFailed`].
    pub async fn submit(
        &self,
        session: Option<&SessionUser>,
        input: SubmissionInput,
    ) -> Result<Character, CoreError> {
        let submission = validate_submission(input)?;
        let owner_id = owner_for(session);
        if let Some(user) = session {
            self.store
                .ensure_user(&NewUser::for_session(user))
                .await
                .map_err(|e| step_failed(SubmissionStep::EnsureOwner, None, e))?;
        }
        let created_at = chrono::Utc::now();

        let character = self
            .store
            .create_character(&NewCharacter {
                id: new_entity_id(),
                owner_id,
                name: submission.name,
                short_worldview: submission.short_worldview,
                description: submission.description,
                has_music: submission.has_music,
                ai_tool_used: submission.ai_tool_used,
                created_at,
            })
            .await
            .map_err(|e| step_failed(SubmissionStep::CreateCharacter, None, e))?;
        let character_id = character.id;

        let image_url = match submission.image {
            ImageSource::Url(url) => url,
            ImageSource::File(file) => {
                let path = object_path(
                    owner_id,
                    character_id,
                    chrono::Utc::now(),
                    &file.file_name,
                    Bucket::Images,
                );
                self.storage
                    .upload(Bucket::Images, &path, &file)
                    .await
                    .map_err(|e| step_failed(SubmissionStep::UploadImage, Some(character_id), e))?
            }
        };

        let prompt_file_url = match &submission.prompt_file {
            Some(file) => {
                let path = object_path(
                    owner_id,
                    character_id,
                    chrono::Utc::now(),
                    &file.file_name,
                    Bucket::Prompts,
                );
                let url = self
                    .storage
                    .upload(Bucket::Prompts, &path, file)
                    .await
                    .map_err(|e| {
                        step_failed(SubmissionStep::UploadPrompt, Some(character_id), e)
                    })?;
                Some(url)
            }
            None => None,
        };

        self.store
            .create_asset(&NewAsset {
                id: new_entity_id(),
                character_id,
                asset_type: AssetType::Image,
                thumbnail_url: image_url.clone(),
                original_url: image_url,
                prompt_summary: compose_prompt_summary(
                    submission.prompt_summary.as_deref(),
                    prompt_file_url.as_deref(),
                ),
                downloadable: true,
            })
            .await
            .map_err(|e| step_failed(SubmissionStep::CreateAsset, Some(character_id), e))?;

        if let Some(music) = submission.music {
            self.store
                .create_music(&NewMusic {
                    id: new_entity_id(),
                    character_id,
                    platform: music.platform,
                    embed_url: music.url,
                    title: music.title,
                    verified_owner: false,
                })
                .await
                .map_err(|e| step_failed(SubmissionStep::CreateMusic, Some(character_id), e))?;
        }

        tracing::info!(
            %character_id,
            %owner_id,
            has_music = character.has_music,
            "Character submitted for review"
        );
        Ok(character)
    }

    /// Every pending character, newest first.
    pub async fn list_pending(&self) -> Result<Vec<CharacterDetail>, CoreError> {
        self.store
            .list_characters(&CharacterQuery::with_status(CharacterStatus::Pending))
            .await
    }

    /// Record an administrator's decision on a pending character.
    ///
    /// The caller must hold a session; admin capability is enforced by the
    /// route guard and the store's access policy.
    pub async fn decide(
        &self,
        session: Option<&SessionUser>,
        character_id: EntityId,
        decision: Decision,
    ) -> Result<Character, CoreError> {
        let reviewer = require_session(session)?;

        let detail = self
            .store
            .find_character(character_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Character",
                id: character_id,
            })?;

        let current = detail.character.status;
        let target = decision.target_status();
        if !current.can_transition_to(target) {
            return Err(CoreError::Conflict(format!(
                "Character {character_id} is already {current}"
            )));
        }
        if target == CharacterStatus::Approved
            && detail.character.has_music
            && detail.music.is_empty()
        {
            return Err(CoreError::Conflict(format!(
                "Character {character_id} is marked as having music but has no music track"
            )));
        }

        let updated = self
            .store
            .transition_status(character_id, CharacterStatus::Pending, target)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Character {character_id} was decided by another reviewer"
                ))
            })?;

        tracing::info!(
            %character_id,
            reviewer = %reviewer.user_id,
            decision = decision.as_str(),
            "Moderation decision recorded"
        );
        Ok(updated)
    }

    pub async fn pending_stats(&self) -> Result<PendingStats, CoreError> {
        let pending = self.list_pending().await?;
        let with_music = pending.iter().filter(|c| c.character.has_music).count();
        Ok(PendingStats {
            total: pending.len(),
            with_music,
            without_music: pending.len() - with_music,
        })
    }

    /// Delete pending characters older than `older_than` that have no asset.
    ///
    /// Returns the ids that were removed. A candidate that gained an asset
    /// or a decision since it was listed is left alone.
    pub async fn sweep_orphans(
        &self,
        older_than: chrono::Duration,
    ) -> Result<Vec<EntityId>, CoreError> {
        let cutoff = chrono::Utc::now()
            .checked_sub_signed(older_than)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Orphan age of {} seconds is out of range",
                    older_than.num_seconds()
                ))
            })?;
        let candidates = self.store.list_orphaned_pending(cutoff).await?;

        let mut removed = Vec::with_capacity(candidates.len());
        for id in candidates {
            if self.store.delete_orphaned_pending(id).await? {
                removed.push(id);
            }
        }

        if !removed.is_empty() {
            tracing::info!(count = removed.len(), %cutoff, "Orphaned submissions removed");
        }
        Ok(removed)
    }
}

fn step_failed(step: SubmissionStep, character_id: Option<EntityId>, error: CoreError) -> CoreError {
    tracing::error!(
        step = step.as_str(),
        character_id = ?character_id,
        error = %error,
        "Submission step failed"
    );
    CoreError::SubmissionFailed {
        step,
        reason: error.to_string(),
    }
}
