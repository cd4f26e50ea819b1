use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// Discount of `value` minor units, capped at the order total.
    FixedAmount,
    /// Discount of `value` percent of the pre-fee total.
    Percentage,
}

impl CouponKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponKind::FixedAmount => "fixed_amount",
            CouponKind::Percentage => "percentage",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "fixed_amount" => Some(CouponKind::FixedAmount),
            "percentage" => Some(CouponKind::Percentage),
            _ => None,
        }
    }
}

impl Display for CouponKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
