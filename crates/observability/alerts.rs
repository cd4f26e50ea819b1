use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::json;
use std::env;
use tokio::sync::mpsc;
use tracing::{error, warn};
use url::Url;

/// A monetary integrity failure that needs human reconciliation.
#[derive(Clone, Debug)]
pub struct ReconciliationAlert {
    pub trade_no: String,
    pub reason: String,
    pub expected_minor: i32,
    pub received_minor: i32,
    pub timestamp: DateTime<Utc>,
}

impl ReconciliationAlert {
    pub fn amount_mismatch(trade_no: &str, expected_minor: i32, received_minor: i32) -> Self {
        Self {
            trade_no: trade_no.to_string(),
            reason: "confirmation amount mismatch".to_string(),
            expected_minor,
            received_minor,
            timestamp: Utc::now(),
        }
    }
}

/// Fan-out handle for reconciliation alerts. Alerts are always logged at
/// error level; when a webhook sink is configured they are additionally
/// queued for delivery. `try_notify` never blocks the confirmation path: a
/// full queue drops the webhook copy with a warning, the log line remains.
#[derive(Clone)]
pub struct AlertNotifier {
    tx: Option<mpsc::Sender<ReconciliationAlert>>,
}

impl AlertNotifier {
    /// Reads ALERT_WEBHOOK_URL; alerts stay log-only when it is unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let raw = env::var("ALERT_WEBHOOK_URL")
            .ok()
            .filter(|value| !value.is_empty());

        let Some(raw) = raw else {
            return Self::log_only();
        };

        match Url::parse(&raw) {
            Ok(url) => Self::with_webhook(url),
            Err(parse_error) => {
                // Never echo the raw value; alert webhook URLs carry secrets.
                warn!(
                    %parse_error,
                    "ALERT_WEBHOOK_URL is set but invalid; reconciliation alerts stay log-only"
                );
                Self::log_only()
            }
        }
    }

    pub fn log_only() -> Self {
        Self { tx: None }
    }

    pub fn with_webhook(webhook_url: Url) -> Self {
        let (tx, mut rx) = mpsc::channel::<ReconciliationAlert>(256);
        let sink = WebhookSink::new(webhook_url);

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(send_error) = sink.send(&alert).await {
                    warn!(error = %send_error, "Reconciliation alert webhook failed");
                }
            }
        });

        Self { tx: Some(tx) }
    }

    pub fn try_notify(&self, alert: ReconciliationAlert) {
        error!(
            trade_no = %alert.trade_no,
            reason = %alert.reason,
            expected_minor = alert.expected_minor,
            received_minor = alert.received_minor,
            "Reconciliation alert"
        );

        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(alert) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Alert queue full; dropping webhook copy");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Alert queue closed; dropping webhook copy");
            }
        }
    }
}

struct WebhookSink {
    webhook_url: Url,
    client: Client,
}

impl WebhookSink {
    fn new(webhook_url: Url) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(3))
            .build()
            .expect("reqwest client must build");

        Self {
            webhook_url,
            client,
        }
    }

    async fn send(&self, alert: &ReconciliationAlert) -> anyhow::Result<()> {
        let content = format!(
            "**reconciliation** `{}`\n> {} on `{}`\n- `expected_minor` = `{}`\n- `received_minor` = `{}`",
            alert.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            alert.reason,
            alert.trade_no,
            alert.expected_minor,
            alert.received_minor,
        );

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&json!({ "content": content }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow::anyhow!(
            "alert webhook returned non-success status: {}",
            response.status()
        ))
    }
}
