use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use crates::{
    domain::{
        repositories::orders::OrderRepository,
        value_objects::enums::{order_statuses::OrderStatus, order_types::OrderType},
    },
    notify::ProvisioningWebhook,
    observability::alerts::{AlertNotifier, ReconciliationAlert},
    payments::{PaymentNotification, gateway_client::GatewayClient},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Verification of inbound provider confirmation callbacks.
#[cfg_attr(test, mockall::automock)]
pub trait CallbackVerifier: Send + Sync {
    fn verify_callback_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> AnyResult<PaymentNotification>;
}

impl CallbackVerifier for GatewayClient {
    fn verify_callback_signature(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> AnyResult<PaymentNotification> {
        GatewayClient::verify_callback_signature(self, payload, signature)
    }
}

/// Provisioning service invoked when a subscription order settles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    async fn activate_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        period: &str,
        trade_no: &str,
    ) -> AnyResult<()>;
}

#[async_trait]
impl ProvisioningApi for ProvisioningWebhook {
    async fn activate_subscription(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        period: &str,
        trade_no: &str,
    ) -> AnyResult<()> {
        self.notify_paid(user_id, plan_id, period, trade_no).await
    }
}

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("invalid callback signature")]
    InvalidSignature,
    #[error("order does not exist")]
    OrderNotFound,
    #[error("confirmation amount does not match the order")]
    AmountMismatch,
    #[error("order cannot accept a payment confirmation")]
    InvalidTransition,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ConfirmationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ConfirmationError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ConfirmationError::OrderNotFound => StatusCode::NOT_FOUND,
            ConfirmationError::AmountMismatch => StatusCode::BAD_REQUEST,
            ConfirmationError::InvalidTransition => StatusCode::CONFLICT,
            ConfirmationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Drives pending orders to their settled states off verified provider
/// confirmations. Every transition is a conditional update, so replayed and
/// racing confirmations settle exactly once.
pub struct PaymentConfirmationUseCase<O, V, N>
where
    O: OrderRepository + Send + Sync + 'static,
    V: CallbackVerifier + 'static,
    N: ProvisioningApi + 'static,
{
    order_repo: Arc<O>,
    verifier: Arc<V>,
    provisioning: Arc<N>,
    alerts: AlertNotifier,
}

impl<O, V, N> PaymentConfirmationUseCase<O, V, N>
where
    O: OrderRepository + Send + Sync + 'static,
    V: CallbackVerifier + 'static,
    N: ProvisioningApi + 'static,
{
    pub fn new(
        order_repo: Arc<O>,
        verifier: Arc<V>,
        provisioning: Arc<N>,
        alerts: AlertNotifier,
    ) -> Self {
        Self {
            order_repo,
            verifier,
            provisioning,
            alerts,
        }
    }

    pub async fn handle_payment_callback(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<(), ConfirmationError> {
        let notification = self
            .verifier
            .verify_callback_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "confirmations: callback signature verification failed");
                ConfirmationError::InvalidSignature
            })?;

        self.confirm_paid(&notification).await
    }

    /// Applies a verified confirmation to its order.
    pub async fn confirm_paid(
        &self,
        notification: &PaymentNotification,
    ) -> Result<(), ConfirmationError> {
        let order = self
            .order_repo
            .find_by_trade_no(&notification.trade_no)
            .await
            .map_err(ConfirmationError::Internal)?
            .ok_or_else(|| {
                warn!(
                    trade_no = %notification.trade_no,
                    "confirmations: unknown trade number"
                );
                ConfirmationError::OrderNotFound
            })?;

        if order.status.is_settled() {
            info!(
                trade_no = %order.trade_no,
                status = %order.status,
                "confirmations: order already settled; acknowledging replay"
            );
            return Ok(());
        }

        if order.status != OrderStatus::Pending {
            warn!(
                trade_no = %order.trade_no,
                status = %order.status,
                "confirmations: order cannot accept a confirmation"
            );
            return Err(ConfirmationError::InvalidTransition);
        }

        let payable_minor = order.payable_amount();
        if notification.amount_minor != payable_minor {
            self.alerts.try_notify(ReconciliationAlert::amount_mismatch(
                &order.trade_no,
                payable_minor,
                notification.amount_minor,
            ));
            return Err(ConfirmationError::AmountMismatch);
        }

        match order.order_type {
            OrderType::Recharge => {
                // Wallet credit = paid amount + tier bonus, atomic with the
                // flip to paid; the status row is the only record of it.
                let credit_minor = order.total_amount + order.discount_amount;
                let credited = self
                    .order_repo
                    .mark_paid_and_credit_if_pending(&order.trade_no, credit_minor)
                    .await
                    .map_err(ConfirmationError::Internal)?;

                if credited {
                    info!(
                        trade_no = %order.trade_no,
                        credit_minor,
                        "confirmations: recharge credited"
                    );
                } else {
                    info!(
                        trade_no = %order.trade_no,
                        "confirmations: lost confirmation race; already settled"
                    );
                }
            }
            OrderType::Subscription => {
                let transitioned = self
                    .order_repo
                    .mark_paid_if_pending(&order.trade_no)
                    .await
                    .map_err(ConfirmationError::Internal)?;

                if !transitioned {
                    info!(
                        trade_no = %order.trade_no,
                        "confirmations: lost confirmation race; already settled"
                    );
                    return Ok(());
                }

                info!(trade_no = %order.trade_no, "confirmations: subscription order paid");

                if let Err(err) = self
                    .provisioning
                    .activate_subscription(
                        order.user_id,
                        order.plan_id,
                        &order.period,
                        &order.trade_no,
                    )
                    .await
                {
                    // The order stays paid; provisioning retries land on the
                    // idempotent fulfillment callback.
                    error!(
                        trade_no = %order.trade_no,
                        error = ?err,
                        "confirmations: provisioning call failed"
                    );
                }
            }
        }

        Ok(())
    }

    /// Idempotent paid→fulfilled callback for provisioning retries; calling
    /// it twice leaves the same final state.
    pub async fn mark_fulfilled(&self, trade_no: &str) -> Result<OrderStatus, ConfirmationError> {
        let order = self
            .order_repo
            .find_by_trade_no(trade_no)
            .await
            .map_err(ConfirmationError::Internal)?
            .ok_or(ConfirmationError::OrderNotFound)?;

        match order.status {
            OrderStatus::Fulfilled => Ok(OrderStatus::Fulfilled),
            OrderStatus::Paid => {
                self.order_repo
                    .mark_fulfilled_if_paid(trade_no)
                    .await
                    .map_err(ConfirmationError::Internal)?;
                // A concurrent retry may have won the update; either way the
                // order is fulfilled now.
                Ok(OrderStatus::Fulfilled)
            }
            _ => {
                warn!(
                    trade_no,
                    status = %order.status,
                    "confirmations: fulfillment attempted on unsettled order"
                );
                Err(ConfirmationError::InvalidTransition)
            }
        }
    }
}
