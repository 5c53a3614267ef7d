//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId};
use serde::Serialize;

use crate::pricing::PricedOrder;

use super::{OrderError, OrderItem, OrderStatus, UpdateOrder, quantities_by_product};

/// Order aggregate root.
///
/// Created once pricing and the remote inventory commit have both succeeded,
/// then only ever moved through its status lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    items: Vec<OrderItem>,
    value: Money,
    discount: u32,
    status: OrderStatus,
    dispatch_date: Option<DateTime<Utc>>,
    creation_date_time: DateTime<Utc>,
}

/// Outcome of applying an [`UpdateOrder`] command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The status did not change (no status requested, or the same one).
    Unchanged,
    /// The order moved from one status to another.
    Moved { from: OrderStatus, to: OrderStatus },
}

impl StatusChange {
    /// Returns true if this change put the order into `status`.
    pub fn entered(&self, status: OrderStatus) -> bool {
        matches!(self, StatusChange::Moved { to, .. } if *to == status)
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Returns the post-discount value.
    pub fn value(&self) -> Money {
        self.value
    }

    /// Returns the value before discount, recomputed from the frozen lines.
    pub fn raw_value(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    /// Total units per product, in order of first appearance.
    pub fn quantities_by_product(&self) -> Vec<(ProductId, u32)> {
        quantities_by_product(&self.items)
    }

    /// Returns the discount percentage.
    pub fn discount(&self) -> u32 {
        self.discount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn dispatch_date(&self) -> Option<DateTime<Utc>> {
        self.dispatch_date
    }

    pub fn creation_date_time(&self) -> DateTime<Utc> {
        self.creation_date_time
    }

    /// Returns true if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Command methods
impl Order {
    /// Creates a freshly placed order from a priced order.
    pub fn place(id: OrderId, priced: PricedOrder, placed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            items: priced.items,
            value: priced.value,
            discount: priced.discount,
            status: OrderStatus::Placed,
            dispatch_date: None,
            creation_date_time: placed_at,
        }
    }

    /// Applies a status update.
    ///
    /// On error the order is left untouched. Entering `Dispatched` stamps the
    /// dispatch date with the command's date or `now`. A dispatch date sent to
    /// an order that is already dispatched, without a status change, replaces
    /// the stored one.
    pub fn apply_update(
        &mut self,
        cmd: &UpdateOrder,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, OrderError> {
        let change = match cmd.status {
            Some(target) if target != self.status => {
                if !self.status.can_transition_to(target) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: target,
                    });
                }
                let from = self.status;
                self.status = target;
                StatusChange::Moved { from, to: target }
            }
            _ => StatusChange::Unchanged,
        };

        if change.entered(OrderStatus::Dispatched) {
            self.dispatch_date = Some(cmd.dispatch_date.unwrap_or(now));
        } else if self.status == OrderStatus::Dispatched
            && let Some(date) = cmd.dispatch_date
        {
            self.dispatch_date = Some(date);
        }

        Ok(change)
    }
}
