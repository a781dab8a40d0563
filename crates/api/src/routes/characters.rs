use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use gallery_core::storage::MAX_UPLOAD_BYTES;

use crate::handlers::characters;
use crate::state::AppState;

/// Room for an image, a prompt file and the JSON payload.
const MULTIPART_BODY_LIMIT: usize = 2 * MAX_UPLOAD_BYTES + 64 * 1024;

/// Character routes mounted at `/characters`.
///
/// ```text
/// POST   /                     -> submit_json
/// POST   /upload               -> submit_multipart
/// POST   /{id}/engagements     -> record_engagement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(characters::submit_json))
        .route(
            "/upload",
            post(characters::submit_multipart).layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
        .route("/{id}/engagements", post(characters::record_engagement))
}
