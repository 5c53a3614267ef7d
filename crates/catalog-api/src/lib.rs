//! Product catalog service.
//!
//! Owns product records and their inventory counts. The order service reads
//! the whole catalog with `GET /products` and writes absolute inventory
//! counts back with `PATCH /products`.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use chrono::Utc;
use domain::seed_catalog;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::products::AppState;
pub use store::{CatalogError, InMemoryCatalog};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            get(routes::products::list).patch(routes::products::update_inventory),
        )
        .route("/products/{id}", get(routes::products::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around an existing catalog.
pub fn create_state(catalog: InMemoryCatalog) -> Arc<AppState> {
    Arc::new(AppState { catalog })
}

/// Creates application state holding the seed catalog.
pub fn create_default_state() -> Arc<AppState> {
    create_state(InMemoryCatalog::new(seed_catalog(Utc::now())))
}
