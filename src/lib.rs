pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod linkedin;
pub mod models;
pub mod routes;
pub mod store;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use time::Duration;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::Level;

use crate::config::LinkedInConfig;
use crate::linkedin::LinkedInClient;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub linkedin: LinkedInClient,
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on `pool`
/// beforehand. This function sets up the session store (and migrates its
/// table), then assembles all route modules, middleware, and state.
pub async fn build_app(pool: SqlitePool, linkedin: LinkedInConfig, secure_cookies: bool) -> Router {
    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("Failed to migrate session store");

    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(30)))
        .with_secure(secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax);

    let state = AppState {
        store: Store::new(pool),
        linkedin: LinkedInClient::new(linkedin),
    };

    Router::new()
        .route("/health", get(health))
        .merge(routes::auth::router())
        .merge(routes::linkedin::router())
        .merge(routes::users::router())
        .merge(routes::groups::router())
        .merge(routes::messages::router())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
