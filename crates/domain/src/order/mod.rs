//! Order aggregate and related types.

mod aggregate;
mod commands;
mod state;
mod value_objects;

pub use aggregate::{Order, StatusChange};
pub use commands::*;
pub use state::OrderStatus;
pub use value_objects::{LineRequest, OrderItem, quantities_by_product};

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The requested status is not one an order can be moved into.
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    /// The transition table does not allow this move.
    #[error("Invalid status transition: cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A line requested zero units.
    #[error("Invalid quantity for product {product_id} (must be greater than 0)")]
    InvalidQuantity { product_id: ProductId },
}
