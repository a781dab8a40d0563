#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use gallery_api::auth::jwt::{generate_access_token, JwtConfig};
use gallery_api::config::{ServerConfig, StoreBackend};
use gallery_api::router::build_app_router;
use gallery_api::state::AppState;
use gallery_core::memory_store::InMemoryStore;
use gallery_core::roles::{ROLE_ADMIN, ROLE_AUTHENTICATED};
use gallery_core::storage::InMemoryObjectStorage;
use gallery_core::types::EntityId;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "gallery-api-test-secret";

/// A running in-memory application plus handles to its backing stores.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub config: ServerConfig,
}

impl TestApp {
    /// A fresh router clone; `oneshot` consumes it.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn admin_token(&self) -> String {
        token_for(uuid::Uuid::now_v7(), ROLE_ADMIN, &self.config.jwt)
    }

    pub fn user_token(&self, user_id: EntityId) -> String {
        token_for(user_id, ROLE_AUTHENTICATED, &self.config.jwt)
    }
}

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        seed_demo_data: false,
        upload_dir: std::env::temp_dir().join("gallery-api-tests"),
        public_upload_base_url: "http://localhost:3000/uploads".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over empty in-memory stores.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(InMemoryStore::new());
    let storage = Arc::new(InMemoryObjectStorage::new(
        config.public_upload_base_url.clone(),
    ));

    let state = AppState::new(store.clone(), storage.clone(), None, config.clone());
    let router = build_app_router(state, &config);

    TestApp {
        router,
        store,
        storage,
        config,
    }
}

pub fn token_for(user_id: EntityId, role: &str, jwt: &JwtConfig) -> String {
    generate_access_token(user_id, role, jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// A minimal valid submission payload.
pub fn submission(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "short_worldview": "A wanderer between stars",
        "image_url": "https://img.example/wanderer.png",
        "agreed_to_terms": true
    })
}
