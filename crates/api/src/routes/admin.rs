//! Route definitions for the moderation review queue.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin/characters`.
///
/// ```text
/// GET    /pending              -> list_pending
/// GET    /pending/stats        -> pending_stats
/// POST   /{id}/approve         -> approve
/// POST   /{id}/reject          -> reject
/// POST   /sweep-orphans        -> sweep_orphans
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(admin::list_pending))
        .route("/pending/stats", get(admin::pending_stats))
        .route("/{id}/approve", post(admin::approve))
        .route("/{id}/reject", post(admin::reject))
        .route("/sweep-orphans", post(admin::sweep_orphans))
}
