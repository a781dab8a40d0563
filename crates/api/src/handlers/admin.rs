//! Admin-only moderation handlers (review queue and decisions).
//!
//! Every handler requires the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::Json;
use gallery_core::character::{Character, CharacterDetail};
use gallery_core::moderation::PendingStats;
use gallery_core::session::SessionUser;
use gallery_core::status::Decision;
use gallery_core::types::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default age, in minutes, before an asset-less pending submission is swept.
pub const DEFAULT_ORPHAN_AGE_MINUTES: i64 = 60;

/// GET /api/v1/admin/characters/pending
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CharacterDetail>>>> {
    let pending = state.workflow.list_pending().await?;
    Ok(Json(DataResponse { data: pending }))
}

/// GET /api/v1/admin/characters/pending/stats
pub async fn pending_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PendingStats>>> {
    let stats = state.workflow.pending_stats().await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/admin/characters/{id}/approve
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(character_id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Character>>> {
    decide(&state, &admin.session(), character_id, Decision::Approved).await
}

/// POST /api/v1/admin/characters/{id}/reject
pub async fn reject(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(character_id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Character>>> {
    decide(&state, &admin.session(), character_id, Decision::Rejected).await
}

async fn decide(
    state: &AppState,
    session: &SessionUser,
    character_id: EntityId,
    decision: Decision,
) -> AppResult<Json<DataResponse<Character>>> {
    let character = state
        .workflow
        .decide(Some(session), character_id, decision)
        .await?;
    Ok(Json(DataResponse { data: character }))
}

#[derive(Debug, Deserialize)]
pub struct SweepParams {
    pub older_than_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub removed: Vec<EntityId>,
}

/// POST /api/v1/admin/characters/sweep-orphans?older_than_minutes=60
///
/// Delete pending submissions that never got an asset.
pub async fn sweep_orphans(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SweepParams>,
) -> AppResult<Json<DataResponse<SweepResponse>>> {
    let minutes = params
        .older_than_minutes
        .unwrap_or(DEFAULT_ORPHAN_AGE_MINUTES);
    if minutes < 0 {
        return Err(AppError::BadRequest(
            "older_than_minutes must not be negative".into(),
        ));
    }
    let older_than = chrono::Duration::try_minutes(minutes)
        .ok_or_else(|| AppError::BadRequest("older_than_minutes is out of range".into()))?;

    let removed = state.workflow.sweep_orphans(older_than).await?;

    tracing::info!(
        admin_id = %admin.user_id,
        older_than_minutes = minutes,
        removed = removed.len(),
        "Orphan sweep requested",
    );

    Ok(Json(DataResponse {
        data: SweepResponse { removed },
    }))
}
