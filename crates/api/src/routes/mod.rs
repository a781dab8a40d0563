pub mod admin;
pub mod characters;
pub mod gallery;
pub mod health;
pub mod session;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /characters                                   submit with image URL (POST)
/// /characters/upload                            submit multipart (POST)
/// /characters/{id}/engagements                  record view/play/download (POST)
///
/// /gallery?partition=with_music|without_music   approved characters (GET)
/// /gallery/sections                             both partitions (GET)
///
/// /admin/characters/pending                     review queue (GET, admin only)
/// /admin/characters/pending/stats               queue counts (GET, admin only)
/// /admin/characters/{id}/approve                approve (POST, admin only)
/// /admin/characters/{id}/reject                 reject (POST, admin only)
/// /admin/characters/sweep-orphans               delete asset-less pending (POST, admin only)
///
/// /session                                      caller identity (GET)
/// /tags                                         all tags (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", characters::router())
        .nest("/gallery", gallery::router())
        .nest("/admin/characters", admin::router())
        .nest("/session", session::router())
        .nest("/tags", tags::router())
}
