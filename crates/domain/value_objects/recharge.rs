use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateRechargeRequest {
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct CreateRechargeResponse {
    pub trade_no: String,
    pub amount: i32,
    pub bonus: i32,
    /// What the wallet will receive once the order is paid.
    pub total: i32,
}

#[derive(Debug, Serialize)]
pub struct BonusTierDto {
    pub threshold: i32,
    pub bonus: i32,
}
