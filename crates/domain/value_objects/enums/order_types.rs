use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Order family. Subscription and recharge orders share the table but carry
/// independent one-pending-order constraints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Subscription,
    Recharge,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Subscription => "subscription",
            OrderType::Recharge => "recharge",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "subscription" => Some(OrderType::Subscription),
            "recharge" => Some(OrderType::Recharge),
            _ => None,
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
