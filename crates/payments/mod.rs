pub mod gateway_client;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound charge request handed to the provider.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PayRequest {
    pub trade_no: String,
    pub amount_minor: i32,
    pub user_id: Uuid,
    /// Client-side provider token (card token and the like), passed through
    /// untouched.
    pub provider_token: Option<String>,
}

/// Provider response to a charge initiation. Redirect flows hand the user a
/// URL; immediate flows report the synchronous outcome, which is advisory
/// only — order state moves exclusively on the verified callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderResponse {
    Redirect { url: String },
    Immediate { succeeded: bool },
}

/// Verified content of a provider confirmation callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentNotification {
    pub trade_no: String,
    pub amount_minor: i32,
}
