use axum::Json;
use gallery_core::session::{can_access_admin_panel, SessionUser};
use serde::Serialize;

use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// `null` when the caller is not signed in.
    pub user: Option<SessionUser>,
    pub can_access_admin_panel: bool,
}

/// GET /api/v1/session
pub async fn current_session(auth: MaybeAuthUser) -> Json<DataResponse<SessionResponse>> {
    let user = auth.session();
    let can_access_admin_panel = can_access_admin_panel(user.as_ref());
    Json(DataResponse {
        data: SessionResponse {
            user,
            can_access_admin_panel,
        },
    })
}
