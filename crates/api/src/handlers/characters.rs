//! Handlers for character submission and engagement.
//!
//! Submission is open to anonymous callers; a valid Bearer token attributes
//! the character to the signed-in user instead of the anonymous owner.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use gallery_core::character::Character;
use gallery_core::engagement::EngagementAction;
use gallery_core::storage::UploadFile;
use gallery_core::submission::SubmissionInput;
use gallery_core::types::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/characters
///
/// Submit a character whose image is referenced by URL.
pub async fn submit_json(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmissionInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Character>>)> {
    let character = state.workflow.submit(auth.session().as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// POST /api/v1/characters/upload
///
/// Multipart submission. Parts:
/// - `payload`: the submission fields as JSON (required)
/// - `image_file`: the character image (optional if `payload.image_url` is set)
/// - `prompt_file`: a prompt text file (optional)
pub async fn submit_multipart(
    auth: MaybeAuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Character>>)> {
    let mut payload: Option<SubmissionInput> = None;
    let mut image_file: Option<UploadFile> = None;
    let mut prompt_file: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "payload" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let input = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid payload JSON: {e}")))?;
                payload = Some(input);
            }
            "image_file" | "prompt_file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an unnamed, empty part for a file input left blank.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let file_name = if file_name.is_empty() {
                    name.clone()
                } else {
                    file_name
                };
                let file = UploadFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                };
                if name == "image_file" {
                    image_file = Some(file);
                } else {
                    prompt_file = Some(file);
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let mut input = payload
        .ok_or_else(|| AppError::BadRequest("Missing required 'payload' field".into()))?;
    input.image_file = image_file;
    input.prompt_file = prompt_file;

    let character = state.workflow.submit(auth.session().as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

#[derive(Debug, Deserialize)]
pub struct EngagementRequest {
    pub action: EngagementAction,
}

#[derive(Debug, Serialize)]
pub struct EngagementResponse {
    pub recorded: bool,
}

/// POST /api/v1/characters/{id}/engagements
///
/// Record a view, play or download. Always 202: a failed write is logged
/// and reported as `recorded: false`.
pub async fn record_engagement(
    State(state): State<AppState>,
    Path(character_id): Path<EntityId>,
    Json(input): Json<EngagementRequest>,
) -> (StatusCode, Json<DataResponse<EngagementResponse>>) {
    let recorded = state.engagement.track(character_id, input.action).await;
    (
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: EngagementResponse { recorded },
        }),
    )
}
