use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Sentinel period recorded on wallet top-up orders. Not a billing cadence,
/// so it is deliberately not a `Period` variant.
pub const RECHARGE_PERIOD: &str = "recharge";

/// Billing cadence keys as exposed by the storefront. Each variant maps to
/// exactly one nullable price column on a plan, so price lookup is a fixed
/// table instead of a dynamic key scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Period {
    #[serde(rename = "month_price")]
    Month,
    #[serde(rename = "quarter_price")]
    Quarter,
    #[serde(rename = "half_year_price")]
    HalfYear,
    #[serde(rename = "year_price")]
    Year,
    #[serde(rename = "two_year_price")]
    TwoYear,
    #[serde(rename = "three_year_price")]
    ThreeYear,
    #[serde(rename = "onetime_price")]
    Onetime,
    #[serde(rename = "reset_price")]
    ResetTraffic,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::Month,
        Period::Quarter,
        Period::HalfYear,
        Period::Year,
        Period::TwoYear,
        Period::ThreeYear,
        Period::Onetime,
        Period::ResetTraffic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Month => "month_price",
            Period::Quarter => "quarter_price",
            Period::HalfYear => "half_year_price",
            Period::Year => "year_price",
            Period::TwoYear => "two_year_price",
            Period::ThreeYear => "three_year_price",
            Period::Onetime => "onetime_price",
            Period::ResetTraffic => "reset_price",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "month_price" => Some(Period::Month),
            "quarter_price" => Some(Period::Quarter),
            "half_year_price" => Some(Period::HalfYear),
            "year_price" => Some(Period::Year),
            "two_year_price" => Some(Period::TwoYear),
            "three_year_price" => Some(Period::ThreeYear),
            "onetime_price" => Some(Period::Onetime),
            "reset_price" => Some(Period::ResetTraffic),
            _ => None,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
