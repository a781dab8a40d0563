use std::sync::Arc;

use gallery_core::engagement::EngagementTracker;
use gallery_core::gallery::GalleryReader;
use gallery_core::moderation::ModerationWorkflow;
use gallery_core::ports::EntityStore;
use gallery_core::storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database pool, present only when the PostgreSQL store is in use.
    pub pool: Option<gallery_db::DbPool>,
    pub store: Arc<dyn EntityStore>,
    pub workflow: Arc<ModerationWorkflow>,
    pub gallery: Arc<GalleryReader>,
    pub engagement: Arc<EngagementTracker>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the core services around one store and one object storage.
    pub fn new(
        store: Arc<dyn EntityStore>,
        storage: Arc<dyn ObjectStorage>,
        pool: Option<gallery_db::DbPool>,
        config: ServerConfig,
    ) -> Self {
        Self {
            pool,
            workflow: Arc::new(ModerationWorkflow::new(Arc::clone(&store), storage)),
            gallery: Arc::new(GalleryReader::new(Arc::clone(&store))),
            engagement: Arc::new(EngagementTracker::new(Arc::clone(&store))),
            store,
            config: Arc::new(config),
        }
    }
}
