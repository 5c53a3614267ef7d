//! Pricing engine.
//!
//! Prices a list of requested lines against a catalog snapshot, freezes each
//! line's unit price, applies the premium discount, and rejects orders the
//! snapshot cannot cover. Pricing never performs I/O and never mutates the
//! snapshot.

use std::collections::HashMap;

use common::{Money, ProductId};

use crate::error::PricingError;
use crate::order::{LineRequest, OrderItem, quantities_by_product};
use crate::product::CatalogSnapshot;

/// Number of premium line items an order needs before the discount applies.
pub const PREMIUM_ITEM_THRESHOLD: usize = 3;

/// Discount, in percent, granted to orders reaching [`PREMIUM_ITEM_THRESHOLD`].
pub const PREMIUM_DISCOUNT_PERCENT: u32 = 10;

/// The result of pricing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Lines with their unit price frozen from the snapshot.
    pub items: Vec<OrderItem>,
    /// Sum of unit price × quantity over all lines.
    pub raw_value: Money,
    /// Value after discount.
    pub value: Money,
    /// Discount percentage applied (0 or [`PREMIUM_DISCOUNT_PERCENT`]).
    pub discount: u32,
}

impl PricedOrder {
    /// Total units requested per product, in order of first appearance.
    pub fn quantities_by_product(&self) -> Vec<(ProductId, u32)> {
        quantities_by_product(&self.items)
    }
}

/// Prices `lines` against `catalog`.
///
/// The inventory check is cumulative per product: a product listed on two
/// lines must have stock for both lines together.
///
/// The premium discount counts line items, not units: two units of one
/// premium product on a single line count once.
pub fn price_order(
    lines: &[LineRequest],
    catalog: &CatalogSnapshot,
) -> Result<PricedOrder, PricingError> {
    let mut items = Vec::with_capacity(lines.len());
    let mut requested: HashMap<ProductId, u32> = HashMap::new();
    let mut raw_value = Money::zero();
    let mut premium_items = 0usize;

    for line in lines {
        let product = catalog
            .get(line.product_id)
            .ok_or(PricingError::UnknownProduct(line.product_id))?;

        let total_requested = requested.entry(product.id).or_insert(0);
        *total_requested = total_requested.saturating_add(line.quantity);
        if product.inventory_count < *total_requested {
            return Err(PricingError::InsufficientInventory {
                product_id: product.id,
                product_name: product.name.clone(),
                requested: *total_requested,
                available: product.inventory_count,
            });
        }

        let item = OrderItem::new(product.id, product.price, line.quantity);
        raw_value = item
            .checked_total_price()
            .and_then(|total| raw_value.checked_add(total))
            .ok_or(PricingError::ValueOverflow {
                product_id: product.id,
            })?;
        items.push(item);

        if product.category.is_premium() {
            premium_items += 1;
        }
    }

    let (value, discount) = if premium_items >= PREMIUM_ITEM_THRESHOLD {
        let reduction = raw_value.percentage(PREMIUM_DISCOUNT_PERCENT);
        (raw_value - reduction, PREMIUM_DISCOUNT_PERCENT)
    } else {
        (raw_value, 0)
    };

    tracing::debug!(
        lines = lines.len(),
        premium_items,
        %raw_value,
        %value,
        discount,
        "order priced"
    );

    Ok(PricedOrder {
        items,
        raw_value,
        value,
        discount,
    })
}
