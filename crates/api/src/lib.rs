//! Order service HTTP API.
//!
//! Places orders against the remote product catalog and moves them through
//! their status lifecycle, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use reconciliation::{CatalogClient, CoordinatorOptions, OrderStore, ReconciliationCoordinator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C: CatalogClient + 'static>(
    state: Arc<AppState<C>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/orders",
            get(routes::orders::list::<C>).post(routes::orders::create::<C>),
        )
        .route(
            "/orders/{id}",
            get(routes::orders::get::<C>).patch(routes::orders::update::<C>),
        )
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

/// Creates application state with an empty order store.
pub fn create_default_state<C: CatalogClient>(
    catalog: C,
    options: CoordinatorOptions,
) -> Arc<AppState<C>> {
    let coordinator = ReconciliationCoordinator::with_options(catalog, OrderStore::new(), options);
    Arc::new(AppState { coordinator })
}
