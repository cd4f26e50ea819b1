use anyhow::{Result, anyhow};
use reqwest::Client;
use serde_json::json;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Notifies the provisioning service that a subscription order was settled.
/// Disabled (log-only) when no webhook URL is configured; the order stays
/// paid either way and retries land on the idempotent fulfillment callback.
pub struct ProvisioningWebhook {
    webhook_url: Option<Url>,
    client: Client,
}

impl ProvisioningWebhook {
    pub fn new(webhook_url: Option<Url>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .expect("reqwest client must build");

        Self {
            webhook_url,
            client,
        }
    }

    pub async fn notify_paid(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        period: &str,
        trade_no: &str,
    ) -> Result<()> {
        let Some(webhook_url) = self.webhook_url.as_ref() else {
            info!(
                %user_id,
                trade_no,
                "Provisioning webhook not configured; skipping activation call"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(webhook_url.clone())
            .json(&json!({
                "event": "order.paid",
                "trade_no": trade_no,
                "user_id": user_id,
                "plan_id": plan_id,
                "period": period,
            }))
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "provisioning webhook returned non-success status: {}",
            response.status()
        ))
    }
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("provisioning webhook request timed out");
    }
    if error.is_connect() {
        return anyhow!("provisioning webhook connection failed");
    }
    anyhow!("provisioning webhook request failed")
}
