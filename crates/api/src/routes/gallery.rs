use axum::routing::get;
use axum::Router;

use crate::handlers::gallery;
use crate::state::AppState;

/// Public gallery routes mounted at `/gallery`.
///
/// ```text
/// GET    /?partition=...       -> list_gallery
/// GET    /sections             -> list_sections
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list_gallery))
        .route("/sections", get(gallery::list_sections))
}
