use std::time::Duration;

use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use tracing::error;

use super::{PayRequest, PaymentNotification, ProviderResponse};

type HmacSha256 = Hmac<Sha256>;

/// Minimal payment-gateway client built on reqwest. The request timeout
/// bounds the only long-running call in the order subsystem; a timed-out
/// checkout leaves the order pending and retryable.
pub struct GatewayClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    callback_secret: String,
    return_url: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorEnvelope {
    error: GatewayErrorDetails,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetails {
    code: Option<String>,
    message: Option<String>,
}

impl GatewayClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        callback_secret: String,
        return_url: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            callback_secret,
            return_url,
        })
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (gateway_error_code, gateway_error_message) =
            match serde_json::from_str::<GatewayErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.code, envelope.error.message),
                Err(_) => (None, None),
            };

        error!(
            status = %status,
            gateway_request_id = ?request_id,
            gateway_error_code = ?gateway_error_code,
            gateway_error_message = ?gateway_error_message,
            response_body = %body,
            context = %context,
            "payment gateway request failed"
        );

        anyhow::bail!(
            "payment gateway request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Initiates a charge for the given trade number and returns the
    /// provider's redirect-or-result payload.
    pub async fn create_payment(&self, request: &PayRequest) -> Result<ProviderResponse> {
        let body = serde_json::json!({
            "trade_no": request.trade_no,
            "amount": request.amount_minor,
            "user_id": request.user_id,
            "token": request.provider_token,
            "return_url": self.return_url,
        });

        let resp = self
            .http
            .post(format!("{}/v1/payments", self.endpoint))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create payment").await?;

        let parsed: ProviderResponse = resp.json().await?;
        Ok(parsed)
    }

    /// Verifies the `t=...,v1=...` HMAC header on a confirmation callback
    /// and parses the notification body.
    pub fn verify_callback_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentNotification> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in signature header"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in signature header"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.callback_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if expected[..] != provided[..] {
            anyhow::bail!("invalid callback signature");
        }

        let notification: PaymentNotification = serde_json::from_slice(payload)?;
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> GatewayClient {
        GatewayClient::new(
            "https://gateway.example.com".to_string(),
            "sk_test_key".to_string(),
            "callback_secret_for_tests".to_string(),
            "https://shop.example.com/return".to_string(),
            30,
        )
        .unwrap()
    }

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, String::from_utf8_lossy(payload)).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_correctly_signed_callback() {
        let client = sample_client();
        let payload = br#"{"trade_no":"a1b2c3","amount_minor":10500}"#;
        let signature = sign("callback_secret_for_tests", "1700000000", payload);
        let header = format!("t=1700000000,v1={signature}");

        let notification = client
            .verify_callback_signature(payload, &header)
            .expect("valid signature should verify");

        assert_eq!(notification.trade_no, "a1b2c3");
        assert_eq!(notification.amount_minor, 10500);
    }

    #[test]
    fn rejects_tampered_payload() {
        let client = sample_client();
        let payload = br#"{"trade_no":"a1b2c3","amount_minor":10500}"#;
        let signature = sign("callback_secret_for_tests", "1700000000", payload);
        let header = format!("t=1700000000,v1={signature}");

        let tampered = br#"{"trade_no":"a1b2c3","amount_minor":1}"#;
        assert!(client.verify_callback_signature(tampered, &header).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let client = sample_client();
        let payload = br#"{"trade_no":"a1b2c3","amount_minor":10500}"#;
        let signature = sign("some_other_secret", "1700000000", payload);
        let header = format!("t=1700000000,v1={signature}");

        assert!(client.verify_callback_signature(payload, &header).is_err());
    }

    #[test]
    fn rejects_malformed_header() {
        let client = sample_client();
        let payload = br#"{"trade_no":"a1b2c3","amount_minor":10500}"#;

        assert!(client.verify_callback_signature(payload, "v1=deadbeef").is_err());
        assert!(client.verify_callback_signature(payload, "t=1700000000").is_err());
    }

    #[test]
    fn provider_response_parses_both_variants() {
        let redirect: ProviderResponse =
            serde_json::from_str(r#"{"type":"redirect","url":"https://pay.example.com/x"}"#)
                .unwrap();
        assert_eq!(
            redirect,
            ProviderResponse::Redirect {
                url: "https://pay.example.com/x".to_string()
            }
        );

        let immediate: ProviderResponse =
            serde_json::from_str(r#"{"type":"immediate","succeeded":true}"#).unwrap();
        assert_eq!(immediate, ProviderResponse::Immediate { succeeded: true });
    }
}
