//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use common::ProductId;
use domain::{Product, ProductCatalog};
use serde::Serialize;

use crate::error::ApiError;
use crate::store::InMemoryCatalog;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub catalog: InMemoryCatalog,
}

#[derive(Serialize)]
pub struct InventoryUpdatedResponse {
    pub updated: usize,
}

/// GET /products
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<ProductCatalog> {
    Json(ProductCatalog {
        products: state.catalog.products().await,
    })
}

/// GET /products/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product_id = parse_product_id(&id)?;

    state
        .catalog
        .get(product_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {product_id} not found")))
}

/// PATCH /products: overwrite inventory counts for a batch of products.
#[tracing::instrument(skip(state, body))]
pub async fn update_inventory(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<Product>>, JsonRejection>,
) -> Result<Json<InventoryUpdatedResponse>, ApiError> {
    let Json(updates) = body?;

    state.catalog.apply_inventory(&updates).await?;

    metrics::counter!("catalog_inventory_updates_total").increment(updates.len() as u64);
    tracing::info!(count = updates.len(), "inventory updated");

    Ok(Json(InventoryUpdatedResponse {
        updated: updates.len(),
    }))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid product ID: {id}")))
}
