use axum::routing::get;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Mounted at `/session`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(session::current_session))
}
