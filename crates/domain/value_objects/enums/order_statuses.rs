use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Order lifecycle. Transitions are monotonic; once an order leaves
/// `Pending` it never returns, and every mutation in the repository layer is
/// a conditional update guarded by the current status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
    Fulfilled,
    /// Settled entirely by discount; no cash moved.
    Discounted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Discounted => "discounted",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "paid" => Some(OrderStatus::Paid),
            "cancelled" => Some(OrderStatus::Cancelled),
            "fulfilled" => Some(OrderStatus::Fulfilled),
            "discounted" => Some(OrderStatus::Discounted),
            _ => None,
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Pending, OrderStatus::Discounted)
                | (OrderStatus::Paid, OrderStatus::Fulfilled)
        )
    }

    /// Whether money has been collected or waived for this order.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Fulfilled | OrderStatus::Discounted
        )
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_forward_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Discounted));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Fulfilled));
    }

    #[test]
    fn settled_orders_never_return_to_pending() {
        for status in [
            OrderStatus::Paid,
            OrderStatus::Cancelled,
            OrderStatus::Fulfilled,
            OrderStatus::Discounted,
        ] {
            assert!(!status.can_transition_to(OrderStatus::Pending));
        }
    }

    #[test]
    fn only_paid_orders_fulfill() {
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Fulfilled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Fulfilled));
        assert!(!OrderStatus::Fulfilled.can_transition_to(OrderStatus::Fulfilled));
    }
}
