use std::net::SocketAddr;
use std::sync::Arc;

use gallery_core::memory_store::InMemoryStore;
use gallery_core::ports::EntityStore;
use gallery_core::storage::LocalObjectStorage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gallery_api::config::{ServerConfig, StoreBackend};
use gallery_api::router::build_app_router;
use gallery_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gallery_api=debug,gallery_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = config.store.name(),
        "Loaded server configuration"
    );

    // --- Entity store (chosen once, never switched at runtime) ---
    let (store, pool): (Arc<dyn EntityStore>, Option<gallery_db::DbPool>) = match &config.store
    {
        StoreBackend::Postgres { database_url } => {
            let pool = gallery_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            gallery_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            gallery_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            if config.seed_demo_data {
                tracing::warn!("SEED_DEMO_DATA is ignored for the PostgreSQL store");
            }

            let store = gallery_db::PgEntityStore::new(pool.clone());
            (Arc::new(store), Some(pool))
        }
        StoreBackend::Memory => {
            let store = InMemoryStore::new();
            if config.seed_demo_data {
                let seeded = gallery_core::demo_data::seed_demo_data(&store)
                    .await
                    .expect("Failed to seed demo data");
                tracing::info!(count = seeded.len(), "Demo characters seeded");
            }
            tracing::warn!("Using the in-memory store; data is lost on restart");
            (Arc::new(store), None)
        }
    };

    // --- Object storage ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");
    let storage = Arc::new(LocalObjectStorage::new(
        config.upload_dir.clone(),
        config.public_upload_base_url.clone(),
    ));
    tracing::info!(upload_dir = %config.upload_dir.display(), "Object storage ready");

    // --- App state + router ---
    let state = AppState::new(store, storage, pool, config.clone());
    let app = build_app_router(state, &config);

    // --- Server ---
    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
