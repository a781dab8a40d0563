use axum::extract::State;
use axum::Json;
use gallery_core::tag::Tag;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// All tags, ordered by name.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Tag>>>> {
    let tags = state.store.list_tags().await?;
    Ok(Json(DataResponse { data: tags }))
}
