//! Order status state machine.

use serde::{Deserialize, Serialize};

use super::OrderError;

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Placed ──┬──► Dispatched ──┬──► Completed
///          │                 └──► Cancelled
///          ├──────────────────────► Completed
///          └──────────────────────► Cancelled
/// ```
///
/// Re-entering the current status is accepted as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order has been priced and its inventory committed.
    #[default]
    Placed,

    /// Order has left the warehouse.
    Dispatched,

    /// Order was delivered (terminal state).
    Completed,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Parses a status requested by a client.
    ///
    /// Only the statuses an order can be moved *into* are accepted; `Placed`
    /// is assigned at creation and can never be requested.
    pub fn parse_target(status: &str) -> Result<OrderStatus, OrderError> {
        match status {
            "Dispatched" => Ok(OrderStatus::Dispatched),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::InvalidStatus(other.to_string())),
        }
    }

    /// Returns true if the transition table allows moving from `self` to `target`.
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;

        if *self == target {
            return true;
        }
        matches!(
            (self, target),
            (Placed, Dispatched)
                | (Placed, Completed)
                | (Placed, Cancelled)
                | (Dispatched, Completed)
                | (Dispatched, Cancelled)
        )
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
