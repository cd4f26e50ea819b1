use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use crates::{
    domain::{
        entities::orders::OrderEntity,
        repositories::{orders::OrderRepository, payment_methods::PaymentMethodRepository},
        value_objects::enums::{order_statuses::OrderStatus, order_types::OrderType},
    },
    payments::{PayRequest, ProviderResponse, gateway_client::GatewayClient},
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{confirmations::ProvisioningApi, pricing::PricingCalculator};

/// Outbound provider calls used at checkout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGatewayApi: Send + Sync {
    async fn create_payment(&self, request: PayRequest) -> AnyResult<ProviderResponse>;
}

#[async_trait]
impl PaymentGatewayApi for GatewayClient {
    async fn create_payment(&self, request: PayRequest) -> AnyResult<ProviderResponse> {
        GatewayClient::create_payment(self, &request).await
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("order does not exist")]
    OrderNotFound,
    #[error("order is not payable")]
    OrderNotPayable,
    #[error("payment method is not available")]
    PaymentMethodUnavailable,
    #[error("payment provider request failed")]
    ProviderUnavailable(anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::OrderNotFound => StatusCode::NOT_FOUND,
            CheckoutError::OrderNotPayable => StatusCode::CONFLICT,
            CheckoutError::PaymentMethodUnavailable => StatusCode::BAD_REQUEST,
            CheckoutError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Resolves a payment method into a provider call. Never advances order
/// status from the provider's synchronous answer; only verified
/// confirmations do that.
pub struct CheckoutUseCase<O, M, G, N>
where
    O: OrderRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    G: PaymentGatewayApi + 'static,
    N: ProvisioningApi + 'static,
{
    order_repo: Arc<O>,
    method_repo: Arc<M>,
    gateway: Arc<G>,
    provisioning: Arc<N>,
    pricing: Arc<PricingCalculator>,
}

impl<O, M, G, N> CheckoutUseCase<O, M, G, N>
where
    O: OrderRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    G: PaymentGatewayApi + 'static,
    N: ProvisioningApi + 'static,
{
    pub fn new(
        order_repo: Arc<O>,
        method_repo: Arc<M>,
        gateway: Arc<G>,
        provisioning: Arc<N>,
        pricing: Arc<PricingCalculator>,
    ) -> Self {
        Self {
            order_repo,
            method_repo,
            gateway,
            provisioning,
            pricing,
        }
    }

    pub async fn checkout(
        &self,
        user_id: Uuid,
        trade_no: &str,
        method_id: Uuid,
        provider_token: Option<String>,
    ) -> Result<ProviderResponse, CheckoutError> {
        let order = self
            .order_repo
            .find_user_order(user_id, trade_no)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| {
                warn!(%user_id, trade_no, "checkout: order not found");
                CheckoutError::OrderNotFound
            })?;

        if order.status != OrderStatus::Pending {
            warn!(trade_no, status = %order.status, "checkout: order is not pending");
            return Err(CheckoutError::OrderNotPayable);
        }

        let method = self
            .method_repo
            .find_enabled_by_id(method_id)
            .await
            .map_err(CheckoutError::Internal)?
            .ok_or_else(|| {
                warn!(%method_id, "checkout: payment method missing or disabled");
                CheckoutError::PaymentMethodUnavailable
            })?;

        let handling_amount = self.pricing.handling_fee(
            order.total_amount,
            method.handling_fee_fixed,
            method.handling_fee_percent_bps,
        );

        // Bind method and fee before touching the provider so an interrupted
        // checkout leaves an auditable record of what was intended.
        let bound = self
            .order_repo
            .bind_payment_method_if_pending(trade_no, method.id, handling_amount)
            .await
            .map_err(CheckoutError::Internal)?;

        if !bound {
            return Err(CheckoutError::OrderNotPayable);
        }

        let order = OrderEntity {
            payment_method_id: Some(method.id),
            handling_amount,
            ..order
        };
        let payable_minor = order.payable_amount();

        if payable_minor == 0 {
            return self.settle_without_charge(&order).await;
        }

        info!(
            trade_no,
            %method_id,
            payable_minor,
            handling_amount = ?handling_amount,
            "checkout: dispatching to payment provider"
        );

        let response = self
            .gateway
            .create_payment(PayRequest {
                trade_no: order.trade_no.clone(),
                amount_minor: payable_minor,
                user_id: order.user_id,
                provider_token,
            })
            .await
            .map_err(|err| {
                // Timeouts and rejections leave the order pending with the
                // intended method and fee recorded; checkout is retryable.
                error!(trade_no, error = ?err, "checkout: provider call failed");
                CheckoutError::ProviderUnavailable(err)
            })?;

        Ok(response)
    }

    /// Settles an order whose discount covers the full price: no provider
    /// round-trip, terminal `discounted` state, immediate provisioning.
    async fn settle_without_charge(
        &self,
        order: &OrderEntity,
    ) -> Result<ProviderResponse, CheckoutError> {
        let settled = self
            .order_repo
            .mark_discounted_if_pending(&order.trade_no)
            .await
            .map_err(CheckoutError::Internal)?;

        if !settled {
            return Err(CheckoutError::OrderNotPayable);
        }

        info!(trade_no = %order.trade_no, "checkout: order fully covered by discount");

        if order.order_type == OrderType::Subscription {
            if let Err(err) = self
                .provisioning
                .activate_subscription(order.user_id, order.plan_id, &order.period, &order.trade_no)
                .await
            {
                error!(
                    trade_no = %order.trade_no,
                    error = ?err,
                    "checkout: provisioning call failed after discounted settlement"
                );
            }
        }

        Ok(ProviderResponse::Immediate { succeeded: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;
    use crates::domain::{
        entities::payment_methods::PaymentMethodEntity,
        repositories::{
            orders::MockOrderRepository, payment_methods::MockPaymentMethodRepository,
        },
        value_objects::pricing::PricingConfig,
    };
    use crate::usecases::confirmations::MockProvisioningApi;

    fn sample_order(user_id: Uuid, total: i32, discount: i32) -> OrderEntity {
        let now = Utc::now();
        OrderEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id: Uuid::new_v4(),
            payment_method_id: None,
            trade_no: "c0ffee00000000000000000000000001".to_string(),
            order_type: OrderType::Subscription,
            period: "month_price".to_string(),
            total_amount: total,
            discount_amount: discount,
            handling_amount: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_method(id: Uuid, fixed: i32, bps: i32) -> PaymentMethodEntity {
        PaymentMethodEntity {
            id,
            name: "Card".to_string(),
            provider: "gateway".to_string(),
            icon: None,
            handling_fee_fixed: fixed,
            handling_fee_percent_bps: bps,
            enable: true,
            sort: 1,
            created_at: Utc::now(),
        }
    }

    fn usecase(
        order_repo: MockOrderRepository,
        method_repo: MockPaymentMethodRepository,
        gateway: MockPaymentGatewayApi,
        provisioning: MockProvisioningApi,
    ) -> CheckoutUseCase<
        MockOrderRepository,
        MockPaymentMethodRepository,
        MockPaymentGatewayApi,
        MockProvisioningApi,
    > {
        CheckoutUseCase::new(
            Arc::new(order_repo),
            Arc::new(method_repo),
            Arc::new(gateway),
            Arc::new(provisioning),
            Arc::new(PricingCalculator::new(PricingConfig::default())),
        )
    }

    #[tokio::test]
    async fn binds_fee_then_charges_total_plus_fee_minus_discount() {
        let user_id = Uuid::new_v4();
        let method_id = Uuid::new_v4();
        let order = sample_order(user_id, 10_000, 2_000);
        let trade_no = order.trade_no.clone();

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });
        order_repo
            .expect_bind_payment_method_if_pending()
            .withf(move |arg, method, fee| {
                arg == trade_no && *method == method_id && *fee == Some(285)
            })
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(true) }));

        let mut method_repo = MockPaymentMethodRepository::new();
        // 250 bps of 10_000 = 250, plus 35 fixed = 285.
        let method = sample_method(method_id, 35, 250);
        method_repo
            .expect_find_enabled_by_id()
            .returning(move |_| {
                let method = method.clone();
                Box::pin(async move { Ok(Some(method)) })
            });

        let mut gateway = MockPaymentGatewayApi::new();
        gateway
            .expect_create_payment()
            .withf(move |request| {
                request.amount_minor == 10_000 + 285 - 2_000 && request.user_id == user_id
            })
            .times(1)
            .returning(|_| {
                Ok(ProviderResponse::Redirect {
                    url: "https://pay.example.com/session/1".to_string(),
                })
            });

        let usecase = usecase(order_repo, method_repo, gateway, MockProvisioningApi::new());

        let response = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                method_id,
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            response,
            ProviderResponse::Redirect {
                url: "https://pay.example.com/session/1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn fee_free_method_binds_no_fee_record() {
        let user_id = Uuid::new_v4();
        let method_id = Uuid::new_v4();
        let order = sample_order(user_id, 10_000, 0);

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });
        order_repo
            .expect_bind_payment_method_if_pending()
            .withf(|_, _, fee| fee.is_none())
            .returning(|_, _, _| Box::pin(async { Ok(true) }));

        let mut method_repo = MockPaymentMethodRepository::new();
        let method = sample_method(method_id, 0, 0);
        method_repo
            .expect_find_enabled_by_id()
            .returning(move |_| {
                let method = method.clone();
                Box::pin(async move { Ok(Some(method)) })
            });

        let mut gateway = MockPaymentGatewayApi::new();
        gateway
            .expect_create_payment()
            .withf(|request| request.amount_minor == 10_000)
            .returning(|_| Ok(ProviderResponse::Immediate { succeeded: true }));

        let usecase = usecase(order_repo, method_repo, gateway, MockProvisioningApi::new());

        let response = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                method_id,
                None,
            )
            .await
            .unwrap();

        assert_eq!(response, ProviderResponse::Immediate { succeeded: true });
    }

    #[tokio::test]
    async fn disabled_method_is_rejected_before_binding() {
        let user_id = Uuid::new_v4();
        let order = sample_order(user_id, 10_000, 0);

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });
        order_repo.expect_bind_payment_method_if_pending().never();

        let mut method_repo = MockPaymentMethodRepository::new();
        method_repo
            .expect_find_enabled_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = usecase(
            order_repo,
            method_repo,
            MockPaymentGatewayApi::new(),
            MockProvisioningApi::new(),
        );

        let result = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                Uuid::new_v4(),
                None,
            )
            .await;

        assert!(matches!(result, Err(CheckoutError::PaymentMethodUnavailable)));
    }

    #[tokio::test]
    async fn settled_order_is_not_payable() {
        let user_id = Uuid::new_v4();
        let mut order = sample_order(user_id, 10_000, 0);
        order.status = OrderStatus::Paid;

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });

        let usecase = usecase(
            order_repo,
            MockPaymentMethodRepository::new(),
            MockPaymentGatewayApi::new(),
            MockProvisioningApi::new(),
        );

        let result = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                Uuid::new_v4(),
                None,
            )
            .await;

        assert!(matches!(result, Err(CheckoutError::OrderNotPayable)));
    }

    #[tokio::test]
    async fn fully_discounted_order_settles_without_provider_call() {
        let user_id = Uuid::new_v4();
        let method_id = Uuid::new_v4();
        // 100% discount, fee-free method: payable is zero.
        let order = sample_order(user_id, 10_000, 10_000);
        let plan_id = order.plan_id;

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });
        order_repo
            .expect_bind_payment_method_if_pending()
            .returning(|_, _, _| Box::pin(async { Ok(true) }));
        order_repo
            .expect_mark_discounted_if_pending()
            .times(1)
            .returning(|_| Box::pin(async { Ok(true) }));

        let mut method_repo = MockPaymentMethodRepository::new();
        let method = sample_method(method_id, 0, 0);
        method_repo
            .expect_find_enabled_by_id()
            .returning(move |_| {
                let method = method.clone();
                Box::pin(async move { Ok(Some(method)) })
            });

        let mut gateway = MockPaymentGatewayApi::new();
        gateway.expect_create_payment().never();

        let mut provisioning = MockProvisioningApi::new();
        provisioning
            .expect_activate_subscription()
            .withf(move |uid, pid, _, _| *uid == user_id && *pid == plan_id)
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let usecase = usecase(order_repo, method_repo, gateway, provisioning);

        let response = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                method_id,
                None,
            )
            .await
            .unwrap();

        assert_eq!(response, ProviderResponse::Immediate { succeeded: true });
    }

    #[tokio::test]
    async fn provider_failure_leaves_order_pending_and_retryable() {
        let user_id = Uuid::new_v4();
        let method_id = Uuid::new_v4();
        let order = sample_order(user_id, 10_000, 0);

        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_find_user_order().returning(move |_, _| {
            let order = order.clone();
            Box::pin(async move { Ok(Some(order)) })
        });
        // Method and fee are still recorded before the provider call.
        order_repo
            .expect_bind_payment_method_if_pending()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(true) }));
        order_repo.expect_mark_paid_if_pending().never();
        order_repo.expect_mark_discounted_if_pending().never();

        let mut method_repo = MockPaymentMethodRepository::new();
        let method = sample_method(method_id, 0, 250);
        method_repo
            .expect_find_enabled_by_id()
            .returning(move |_| {
                let method = method.clone();
                Box::pin(async move { Ok(Some(method)) })
            });

        let mut gateway = MockPaymentGatewayApi::new();
        gateway
            .expect_create_payment()
            .returning(|_| Err(anyhow!("gateway timed out")));

        let usecase = usecase(order_repo, method_repo, gateway, MockProvisioningApi::new());

        let result = usecase
            .checkout(
                user_id,
                "c0ffee00000000000000000000000001",
                method_id,
                None,
            )
            .await;

        assert!(matches!(result, Err(CheckoutError::ProviderUnavailable(_))));
    }
}
