//! Order commands.

use chrono::{DateTime, Utc};
use common::OrderId;

use super::{LineRequest, OrderError, OrderStatus};

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// Requested lines, in the order the customer listed them.
    pub items: Vec<LineRequest>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command.
    ///
    /// Every line must request at least one unit.
    pub fn new(items: Vec<LineRequest>) -> Result<Self, OrderError> {
        if let Some(line) = items.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                product_id: line.product_id,
            });
        }
        Ok(Self { items })
    }
}

/// Command to move an order through its lifecycle.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    /// The order to update.
    pub order_id: OrderId,

    /// Requested status, if any.
    pub status: Option<OrderStatus>,

    /// Explicit dispatch timestamp. When absent and the order enters
    /// `Dispatched`, the current time is used.
    pub dispatch_date: Option<DateTime<Utc>>,
}

impl UpdateOrder {
    /// Creates a new UpdateOrder command from a client-supplied status string.
    ///
    /// An empty status means "leave the status as it is".
    pub fn new(
        order_id: OrderId,
        status: Option<&str>,
        dispatch_date: Option<DateTime<Utc>>,
    ) -> Result<Self, OrderError> {
        let status = match status {
            None | Some("") => None,
            Some(s) => Some(OrderStatus::parse_target(s)?),
        };
        Ok(Self {
            order_id,
            status,
            dispatch_date,
        })
    }

    /// Creates a command that only changes the status.
    pub fn to_status(order_id: OrderId, status: OrderStatus) -> Self {
        Self {
            order_id,
            status: Some(status),
            dispatch_date: None,
        }
    }
}
