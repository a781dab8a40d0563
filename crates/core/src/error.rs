use crate::types::EntityId;

/// Pipeline step of a character submission, reported when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStep {
    EnsureOwner,
    CreateCharacter,
    UploadImage,
    UploadPrompt,
    CreateAsset,
    CreateMusic,
}

impl SubmissionStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnsureOwner => "ensure_owner",
            Self::CreateCharacter => "create_character",
            Self::UploadImage => "upload_image",
            Self::UploadPrompt => "upload_prompt",
            Self::CreateAsset => "create_asset",
            Self::CreateMusic => "create_music",
        }
    }
}

impl std::fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    /// A mid-pipeline submission failure. Earlier writes are left in place.
    #[error("Submission failed at step {step}: {reason}")]
    SubmissionFailed {
        step: SubmissionStep,
        reason: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
