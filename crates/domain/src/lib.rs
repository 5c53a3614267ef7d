//! Domain layer for order placement.
//!
//! This crate provides:
//! - Catalog products and point-in-time catalog snapshots
//! - The pricing engine (frozen unit prices, premium discount, stock checks)
//! - The order aggregate with its status state machine

pub mod error;
pub mod order;
pub mod pricing;
pub mod product;

pub use common::{Money, OrderId, ProductId};
pub use error::PricingError;
pub use order::{
    LineRequest, Order, OrderError, OrderItem, OrderStatus, PlaceOrder, StatusChange, UpdateOrder,
    quantities_by_product,
};
pub use pricing::{PREMIUM_DISCOUNT_PERCENT, PREMIUM_ITEM_THRESHOLD, PricedOrder, price_order};
pub use product::{CatalogSnapshot, Category, Product, ProductCatalog, seed_catalog};
