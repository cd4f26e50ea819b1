use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use crates::{
    domain::{
        repositories::orders::OrderRepository,
        value_objects::orders::{FulfillmentRequest, OrderStatusResponse},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::orders::OrderPostgres,
    },
    notify::ProvisioningWebhook,
    observability::alerts::AlertNotifier,
    payments::gateway_client::GatewayClient,
};

use crate::axum_http::error_responses::error_response;
use crate::usecases::confirmations::{
    CallbackVerifier, PaymentConfirmationUseCase, ProvisioningApi,
};

const SIGNATURE_HEADER: &str = "x-payment-signature";

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    gateway: Arc<GatewayClient>,
    provisioning: Arc<ProvisioningWebhook>,
    alerts: AlertNotifier,
) -> Router {
    let confirmation_usecase = Arc::new(PaymentConfirmationUseCase::new(
        Arc::new(OrderPostgres::new(Arc::clone(&db_pool))),
        gateway,
        provisioning,
        alerts,
    ));

    Router::new()
        .route("/payment", post(payment_callback))
        .route("/fulfillment", post(fulfillment_callback))
        .with_state(confirmation_usecase)
}

/// Inbound provider confirmation. The raw body is verified against the
/// signature header before anything is parsed out of it.
pub async fn payment_callback<O, V, N>(
    State(confirmation_usecase): State<Arc<PaymentConfirmationUseCase<O, V, N>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    V: CallbackVerifier + 'static,
    N: ProvisioningApi + 'static,
{
    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return error_response(StatusCode::UNAUTHORIZED, "missing payment signature header");
    };

    match confirmation_usecase
        .handle_payment_callback(&body, signature)
        .await
    {
        Ok(()) => (StatusCode::OK, "success").into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

/// Provisioning-completion callback; safe to retry.
pub async fn fulfillment_callback<O, V, N>(
    State(confirmation_usecase): State<Arc<PaymentConfirmationUseCase<O, V, N>>>,
    Json(request): Json<FulfillmentRequest>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    V: CallbackVerifier + 'static,
    N: ProvisioningApi + 'static,
{
    match confirmation_usecase.mark_fulfilled(&request.trade_no).await {
        Ok(status) => Json(OrderStatusResponse { status }).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
