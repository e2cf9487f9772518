//! Pricing, agent commission and currency engine for dive center operations.

pub mod cache;
pub mod commission;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod tax;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::{AppCache, CacheStats};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/pricing", pricing::router())
        .nest("/commissions", commission::router())
        .nest("/currency", currency::router())
        .nest("/tax", tax::router())
        .route("/cache/stats", get(cache_stats))
        .route("/cache/invalidate", post(invalidate_cache));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    Json(state.cache.stats())
}
