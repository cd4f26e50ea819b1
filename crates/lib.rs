pub mod domain;
pub mod infra;
pub mod notify;
pub mod observability;
pub mod payments;
