use serde::{Deserialize, Serialize};

/// One recharge bonus tier: meeting `threshold_minor` grants `bonus_minor`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusTier {
    pub threshold_minor: i32,
    pub bonus_minor: i32,
}

/// Immutable pricing rules handed to the calculator at construction, never
/// read from ambient state. `version` identifies the ruleset in order logs.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub version: u32,
    /// Kept sorted by threshold, highest first; the first tier an amount
    /// meets wins.
    pub bonus_tiers: Vec<BonusTier>,
    pub recharge_min: i32,
    pub recharge_max: i32,
}

impl PricingConfig {
    pub fn new(
        version: u32,
        mut bonus_tiers: Vec<BonusTier>,
        recharge_min: i32,
        recharge_max: i32,
    ) -> Self {
        bonus_tiers.sort_by(|a, b| b.threshold_minor.cmp(&a.threshold_minor));
        Self {
            version,
            bonus_tiers,
            recharge_min,
            recharge_max,
        }
    }
}

impl Default for PricingConfig {
    /// The production ruleset.
    fn default() -> Self {
        Self::new(
            1,
            vec![
                BonusTier { threshold_minor: 200_000, bonus_minor: 100_000 },
                BonusTier { threshold_minor: 100_000, bonus_minor: 50_000 },
                BonusTier { threshold_minor: 50_000, bonus_minor: 20_000 },
                BonusTier { threshold_minor: 30_000, bonus_minor: 10_000 },
                BonusTier { threshold_minor: 20_000, bonus_minor: 5_000 },
                BonusTier { threshold_minor: 10_000, bonus_minor: 1_500 },
            ],
            1_000,
            1_000_000,
        )
    }
}
