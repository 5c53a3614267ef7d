//! Domain error types.

use common::ProductId;
use thiserror::Error;

/// Errors produced while pricing an order against a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A line item references a product the catalog does not contain.
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    /// The catalog does not hold enough units of a product.
    #[error("There is not enough of \"{product_name}\" to fulfill this order (requested {requested}, available {available})")]
    InsufficientInventory {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// The order total does not fit in a money amount.
    #[error("Order value overflows at product {product_id}")]
    ValueOverflow { product_id: ProductId },
}
