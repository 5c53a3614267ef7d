//! Shared types for the order and catalog services.

mod money;
mod types;

pub use money::Money;
pub use types::{OrderId, ProductId};
