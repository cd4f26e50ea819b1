use crates::domain::{
    entities::plans::PlanEntity,
    value_objects::{
        coupons::DiscountDescriptor,
        enums::{coupon_kinds::CouponKind, periods::Period},
        pricing::{BonusTier, PricingConfig},
    },
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("plan has no price for the requested period")]
    InvalidPeriod,
}

/// Pure pricing rules over an immutable, versioned configuration. All
/// arithmetic is integral minor units; nothing here touches storage.
pub struct PricingCalculator {
    config: PricingConfig,
}

impl PricingCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config_version(&self) -> u32 {
        self.config.version
    }

    pub fn recharge_min(&self) -> i32 {
        self.config.recharge_min
    }

    pub fn recharge_max(&self) -> i32 {
        self.config.recharge_max
    }

    pub fn bonus_tiers(&self) -> &[BonusTier] {
        &self.config.bonus_tiers
    }

    pub fn price_for(&self, plan: &PlanEntity, period: Period) -> Result<i32, PricingError> {
        plan.price_for(period).ok_or(PricingError::InvalidPeriod)
    }

    /// Handling fee for a payment method, or `None` when the method carries
    /// no fee at all. Absence and a computed zero are distinct: only a
    /// configured fee is recorded on the order.
    pub fn handling_fee(
        &self,
        base_amount: i32,
        fixed_minor: i32,
        percent_bps: i32,
    ) -> Option<i32> {
        if fixed_minor == 0 && percent_bps == 0 {
            return None;
        }

        Some(round_half_up_bps(base_amount, percent_bps) + fixed_minor)
    }

    /// Discount granted by a validated coupon, capped at the pre-fee total
    /// so the final payable amount can never go negative.
    pub fn discount_for(&self, total_amount: i32, descriptor: &DiscountDescriptor) -> i32 {
        let raw = match descriptor.kind {
            CouponKind::FixedAmount => descriptor.value,
            CouponKind::Percentage => {
                (i64::from(total_amount) * i64::from(descriptor.value) / 100) as i32
            }
        };

        raw.clamp(0, total_amount)
    }

    /// Wallet bonus for a recharge amount: the first tier (highest threshold
    /// first) the amount meets or exceeds wins. Boundaries are inclusive.
    pub fn recharge_bonus(&self, amount_minor: i32) -> i32 {
        for tier in &self.config.bonus_tiers {
            if amount_minor >= tier.threshold_minor {
                return tier.bonus_minor;
            }
        }

        0
    }
}

fn round_half_up_bps(base_amount: i32, percent_bps: i32) -> i32 {
    ((i64::from(base_amount) * i64::from(percent_bps) + 5_000) / 10_000) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_plan() -> PlanEntity {
        let now = Utc::now();
        PlanEntity {
            id: Uuid::new_v4(),
            name: "Premium".to_string(),
            content: None,
            tags: vec![],
            month_price: Some(10_000),
            quarter_price: Some(27_000),
            half_year_price: Some(50_000),
            year_price: Some(90_000),
            two_year_price: None,
            three_year_price: None,
            onetime_price: None,
            reset_price: Some(500),
            is_active: true,
            sort: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn calculator() -> PricingCalculator {
        PricingCalculator::new(PricingConfig::default())
    }

    #[test]
    fn price_for_returns_each_configured_period() {
        let plan = sample_plan();
        let pricing = calculator();

        assert_eq!(pricing.price_for(&plan, Period::Month), Ok(10_000));
        assert_eq!(pricing.price_for(&plan, Period::Quarter), Ok(27_000));
        assert_eq!(pricing.price_for(&plan, Period::HalfYear), Ok(50_000));
        assert_eq!(pricing.price_for(&plan, Period::Year), Ok(90_000));
        assert_eq!(pricing.price_for(&plan, Period::ResetTraffic), Ok(500));
    }

    #[test]
    fn price_for_rejects_unconfigured_periods() {
        let plan = sample_plan();
        let pricing = calculator();

        for period in [Period::TwoYear, Period::ThreeYear, Period::Onetime] {
            assert_eq!(
                pricing.price_for(&plan, period),
                Err(PricingError::InvalidPeriod)
            );
        }
    }

    #[test]
    fn every_period_resolves_to_its_column_or_fails() {
        let plan = sample_plan();
        let pricing = calculator();

        for period in Period::ALL {
            match plan.price_for(period) {
                Some(expected) => {
                    assert_eq!(pricing.price_for(&plan, period), Ok(expected));
                }
                None => {
                    assert_eq!(
                        pricing.price_for(&plan, period),
                        Err(PricingError::InvalidPeriod)
                    );
                }
            }
        }
    }

    #[test]
    fn handling_fee_is_absent_when_method_has_no_fee() {
        assert_eq!(calculator().handling_fee(10_000, 0, 0), None);
    }

    #[test]
    fn handling_fee_is_recorded_even_when_it_computes_to_zero() {
        // 1 bps of 100 minor units rounds to 0, but the fee is configured.
        assert_eq!(calculator().handling_fee(100, 0, 1), Some(0));
    }

    #[test]
    fn handling_fee_rounds_half_up() {
        let pricing = calculator();

        // 250 bps of 10_000 = 250 exactly.
        assert_eq!(pricing.handling_fee(10_000, 0, 250), Some(250));
        // 250 bps of 10_020 = 250.5, rounds up to 251.
        assert_eq!(pricing.handling_fee(10_020, 0, 250), Some(251));
        // 250 bps of 10_019 = 250.475, rounds down to 250.
        assert_eq!(pricing.handling_fee(10_019, 0, 250), Some(250));
        // Fixed component stacks on top of the rounded percent part.
        assert_eq!(pricing.handling_fee(10_000, 35, 250), Some(285));
    }

    #[test]
    fn percentage_discount_matches_save50_scenario() {
        let pricing = calculator();
        let descriptor = DiscountDescriptor {
            kind: CouponKind::Percentage,
            value: 50,
            limit_plan_ids: None,
            limit_periods: None,
        };

        assert_eq!(pricing.discount_for(10_000, &descriptor), 5_000);
    }

    #[test]
    fn fixed_discount_caps_at_order_total() {
        let pricing = calculator();
        let descriptor = DiscountDescriptor {
            kind: CouponKind::FixedAmount,
            value: 12_000,
            limit_plan_ids: None,
            limit_periods: None,
        };

        assert_eq!(pricing.discount_for(10_000, &descriptor), 10_000);
    }

    #[test]
    fn oversized_percentage_discount_caps_at_order_total() {
        let pricing = calculator();
        let descriptor = DiscountDescriptor {
            kind: CouponKind::Percentage,
            value: 150,
            limit_plan_ids: None,
            limit_periods: None,
        };

        assert_eq!(pricing.discount_for(10_000, &descriptor), 10_000);
    }

    #[test]
    fn recharge_bonus_thresholds_are_inclusive() {
        let pricing = calculator();

        assert_eq!(pricing.recharge_bonus(199_999), 50_000);
        assert_eq!(pricing.recharge_bonus(200_000), 100_000);
        assert_eq!(pricing.recharge_bonus(50_000), 20_000);
        assert_eq!(pricing.recharge_bonus(10_000), 1_500);
        assert_eq!(pricing.recharge_bonus(9_999), 0);
    }

    #[test]
    fn recharge_bonus_is_monotonic_across_boundaries() {
        let pricing = calculator();
        let mut previous = 0;

        for amount in [
            9_999, 10_000, 19_999, 20_000, 29_999, 30_000, 49_999, 50_000, 99_999, 100_000,
            199_999, 200_000, 500_000,
        ] {
            let bonus = pricing.recharge_bonus(amount);
            assert!(
                bonus >= previous,
                "bonus decreased at amount {amount}: {bonus} < {previous}"
            );
            previous = bonus;
        }
    }

    #[test]
    fn bonus_tiers_are_sorted_descending_regardless_of_input_order() {
        let config = PricingConfig::new(
            2,
            vec![
                BonusTier { threshold_minor: 10_000, bonus_minor: 1_500 },
                BonusTier { threshold_minor: 200_000, bonus_minor: 100_000 },
                BonusTier { threshold_minor: 50_000, bonus_minor: 20_000 },
            ],
            1_000,
            1_000_000,
        );
        let pricing = PricingCalculator::new(config);

        // A mis-sorted table would match 10_000 first and return 1_500.
        assert_eq!(pricing.recharge_bonus(250_000), 100_000);
    }
}
