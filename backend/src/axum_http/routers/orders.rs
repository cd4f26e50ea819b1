use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            coupons::CouponRepository, orders::OrderRepository,
            payment_methods::PaymentMethodRepository, plans::PlanRepository,
            users::UserDirectory,
        },
        value_objects::orders::{
            CancelOrderRequest, CheckoutRequest, CreateOrderRequest, CreateOrderResponse,
            OrderStatusResponse,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            coupons::CouponPostgres, orders::OrderPostgres,
            payment_methods::PaymentMethodPostgres, plans::PlanPostgres, users::UserPostgres,
        },
    },
    notify::ProvisioningWebhook,
    payments::gateway_client::GatewayClient,
};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::axum_http::error_responses::error_response;
use crate::usecases::{
    checkout::{CheckoutUseCase, PaymentGatewayApi},
    confirmations::ProvisioningApi,
    coupons::CouponUseCase,
    orders::{OrderIdentity, OrderUseCase},
    pricing::PricingCalculator,
};

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    pricing: Arc<PricingCalculator>,
    gateway: Arc<GatewayClient>,
    provisioning: Arc<ProvisioningWebhook>,
) -> Router {
    let order_repo = Arc::new(OrderPostgres::new(Arc::clone(&db_pool)));

    let orders_usecase = Arc::new(OrderUseCase::new(
        Arc::clone(&order_repo),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        CouponUseCase::new(Arc::new(CouponPostgres::new(Arc::clone(&db_pool)))),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&pricing),
    ));

    let checkout_usecase = Arc::new(CheckoutUseCase::new(
        order_repo,
        Arc::new(PaymentMethodPostgres::new(Arc::clone(&db_pool))),
        gateway,
        provisioning,
        pricing,
    ));

    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:trade_no/status", get(order_status))
        .route("/cancel", post(cancel_order))
        .with_state(orders_usecase)
        .merge(
            Router::new()
                .route("/checkout", post(checkout))
                .with_state(checkout_usecase),
        )
}

pub async fn create_order<O, P, C, U>(
    State(orders_usecase): State<Arc<OrderUseCase<O, P, C, U>>>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    let identity = match auth {
        Some(user) => OrderIdentity::User(user.user_id),
        None => match (request.email.clone(), request.password.clone()) {
            (Some(email), Some(password)) => OrderIdentity::Guest { email, password },
            _ => {
                return error_response(
                    StatusCode::UNAUTHORIZED,
                    "registration credentials are required for guest checkout",
                );
            }
        },
    };

    match orders_usecase
        .create_order(
            identity,
            request.plan_id,
            &request.period,
            request.coupon_code.as_deref(),
        )
        .await
    {
        Ok(order) => Json(CreateOrderResponse {
            trade_no: order.trade_no,
        })
        .into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_orders<O, P, C, U>(
    State(orders_usecase): State<Arc<OrderUseCase<O, P, C, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    match orders_usecase.list_orders(auth.user_id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn order_status<O, P, C, U>(
    State(orders_usecase): State<Arc<OrderUseCase<O, P, C, U>>>,
    auth: AuthUser,
    Path(trade_no): Path<String>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    match orders_usecase.order_status(auth.user_id, &trade_no).await {
        Ok(status) => Json(OrderStatusResponse { status }).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn cancel_order<O, P, C, U>(
    State(orders_usecase): State<Arc<OrderUseCase<O, P, C, U>>>,
    auth: AuthUser,
    Json(request): Json<CancelOrderRequest>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    match orders_usecase
        .cancel_order(auth.user_id, &request.trade_no)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn checkout<O, M, G, N>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<O, M, G, N>>>,
    auth: AuthUser,
    Json(request): Json<CheckoutRequest>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    G: PaymentGatewayApi + 'static,
    N: ProvisioningApi + 'static,
{
    match checkout_usecase
        .checkout(
            auth.user_id,
            &request.trade_no,
            request.method_id,
            request.token,
        )
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
