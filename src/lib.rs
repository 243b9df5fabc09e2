pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod list;
pub mod map;
pub mod models;
pub mod routes;
pub mod store;

pub const STATIC_HASH: &str = env!("STATIC_HASH");

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::VisitApp;
use crate::config::MapConfig;
use crate::store::VisitStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub store: VisitStore,
    /// Every request handles one user event while holding this lock.
    pub app: Arc<Mutex<VisitApp>>,
}

async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations on `pool` beforehand.
/// Persisted visits are restored into the controller before the router is
/// returned.
pub async fn build_app(pool: SqlitePool, map_config: MapConfig) -> Router {
    let store = VisitStore::new(pool.clone());
    let app = VisitApp::start(store.clone(), map_config).await;

    let state = AppState {
        db: pool,
        store,
        app: Arc::new(Mutex::new(app)),
    };

    Router::new()
        .route("/health", get(health))
        .merge(routes::page::router())
        .merge(routes::location::router())
        .merge(routes::visits::router())
        .merge(routes::export::router())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400"),
                ))
                .service(ServeDir::new("static")),
        )
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
