//! Placement error types.

use common::{OrderId, ProductId};
use domain::{OrderError, PricingError};
use thiserror::Error;

/// Errors that can occur while placing or updating orders.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The catalog snapshot could not be fetched (transport error, bad
    /// response, or timeout).
    #[error("Failed to get product catalog: {0}")]
    CatalogUnavailable(String),

    /// The product service did not accept an inventory write.
    #[error("Failed to update product catalog: {0}")]
    CatalogUpdateFailed(String),

    /// Applying the order would drive a product's inventory below zero.
    #[error(
        "Inventory invariant violated for product {product_id}: {requested} requested, {available} available"
    )]
    InvariantViolation {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// No order with this identifier exists.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Pricing rejected the order.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The order state machine rejected the update.
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl PlacementError {
    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            PlacementError::CatalogUnavailable(_) => "catalog_unavailable",
            PlacementError::CatalogUpdateFailed(_) => "catalog_update_failed",
            PlacementError::InvariantViolation { .. } => "invariant_violation",
            PlacementError::OrderNotFound(_) => "order_not_found",
            PlacementError::Pricing(PricingError::UnknownProduct(_)) => "unknown_product",
            PlacementError::Pricing(PricingError::InsufficientInventory { .. }) => {
                "insufficient_inventory"
            }
            PlacementError::Pricing(PricingError::ValueOverflow { .. }) => "value_overflow",
            PlacementError::Order(OrderError::InvalidStatus(_)) => "invalid_status",
            PlacementError::Order(OrderError::InvalidTransition { .. }) => "invalid_transition",
            PlacementError::Order(OrderError::InvalidQuantity { .. }) => "invalid_quantity",
        }
    }
}

/// Convenience type alias for placement results.
pub type Result<T> = std::result::Result<T, PlacementError>;
