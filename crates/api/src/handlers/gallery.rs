//! Public gallery read handlers.

use axum::extract::{Query, State};
use axum::Json;
use gallery_core::gallery::{GalleryEntry, GalleryPartition, GallerySections};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GalleryParams {
    pub partition: String,
}

/// GET /api/v1/gallery?partition=with_music|without_music
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> AppResult<Json<DataResponse<Vec<GalleryEntry>>>> {
    let partition = GalleryPartition::from_name(&params.partition)?;
    let entries = state.gallery.list_approved(partition).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/gallery/sections
///
/// Both partitions, read concurrently.
pub async fn list_sections(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<GallerySections>>> {
    let sections = state.gallery.list_sections().await?;
    Ok(Json(DataResponse { data: sections }))
}
