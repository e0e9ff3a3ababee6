//! Courier delivery pricing service.
//!
//! Library half of the `courier-pricing` binary: the pure pricing engine, the
//! distance lookup collaborator and the axum application that serves both.

pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::cache::AppCache;
use crate::config::Config;
use crate::distance::DistanceLookup;
use crate::error::AppError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: AppCache,
    pub distance: Arc<dyn DistanceLookup>,
}

impl AppState {
    pub fn new(config: Config, distance: Arc<dyn DistanceLookup>) -> Self {
        let cache = AppCache::new(config.distance_cache_ttl);
        Self {
            config: Arc::new(config),
            cache,
            distance,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    distance_cache_entries: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        distance_cache_entries: state.cache.stats().distances_size,
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
