//! Order placement and status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId};
use domain::{LineRequest, Order, OrderItem, OrderStatus, PlaceOrder, UpdateOrder};
use reconciliation::{CatalogClient, ReconciliationCoordinator};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C: CatalogClient> {
    pub coordinator: ReconciliationCoordinator<C>,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub product_qty: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub dispatch_date: Option<DateTime<Utc>>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub items: Vec<OrderItemResponse>,
    pub value: Money,
    pub status: OrderStatus,
    pub discount: u32,
    pub dispatch_date: Option<DateTime<Utc>>,
    pub creation_date_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub product_price: Money,
    pub product_qty: u32,
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_price: item.unit_price,
            product_qty: item.quantity,
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            items: order.items().iter().map(OrderItemResponse::from).collect(),
            value: order.value(),
            status: order.status(),
            discount: order.discount(),
            dispatch_date: order.dispatch_date(),
            creation_date_time: order.creation_date_time(),
        }
    }
}

// -- Handlers --

/// GET /orders: every order, oldest first.
#[tracing::instrument(skip(state))]
pub async fn list<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<Vec<OrderResponse>> {
    let orders = state.coordinator.list_orders().await;
    Json(orders.iter().map(OrderResponse::from).collect())
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.coordinator.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders: price the requested lines, commit inventory, store the order.
#[tracing::instrument(skip(state, body))]
pub async fn create<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(req) = body?;

    let lines = req
        .items
        .iter()
        .map(|item| LineRequest::new(item.product_id, item.product_qty))
        .collect();
    let cmd = PlaceOrder::new(lines)?;

    let order = state.coordinator.place_order(cmd).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// PATCH /orders/{id}: change status and/or dispatch date.
#[tracing::instrument(skip(state, body))]
pub async fn update<C: CatalogClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let Json(req) = body?;

    // An unknown order is reported before the requested status is validated.
    state.coordinator.get_order(order_id).await?;

    let cmd = UpdateOrder::new(order_id, req.status.as_deref(), req.dispatch_date)?;
    let order = state.coordinator.update_order(cmd).await?;
    Ok(Json(OrderResponse::from(&order)))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID {id:?}: {e}")))
}
