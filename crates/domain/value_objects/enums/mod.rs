pub mod coupon_kinds;
pub mod order_statuses;
pub mod order_types;
pub mod periods;
