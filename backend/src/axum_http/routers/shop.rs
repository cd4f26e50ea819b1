use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            coupons::CouponRepository, payment_methods::PaymentMethodRepository,
            plans::PlanRepository,
        },
        value_objects::{
            coupons::CheckCouponRequest, enums::periods::Period,
            payment_methods::PaymentMethodDto, plans::PlanDto,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            coupons::CouponPostgres, payment_methods::PaymentMethodPostgres, plans::PlanPostgres,
        },
    },
};
use tracing::error;

use crate::axum_http::error_responses::error_response;
use crate::usecases::coupons::CouponUseCase;

pub struct ShopState<P, M, C>
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    method_repo: Arc<M>,
    coupons: CouponUseCase<C>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let state = ShopState {
        plan_repo: Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        method_repo: Arc::new(PaymentMethodPostgres::new(Arc::clone(&db_pool))),
        coupons: CouponUseCase::new(Arc::new(CouponPostgres::new(Arc::clone(&db_pool)))),
    };

    Router::new()
        .route("/plans", get(list_plans))
        .route("/payment-methods", get(list_payment_methods))
        .route("/coupons/check", post(check_coupon))
        .with_state(Arc::new(state))
}

pub async fn list_plans<P, M, C>(
    State(state): State<Arc<ShopState<P, M, C>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
{
    match state.plan_repo.list_active_plans().await {
        Ok(plans) => {
            Json(plans.into_iter().map(PlanDto::from).collect::<Vec<_>>()).into_response()
        }
        Err(err) => {
            error!(db_error = ?err, "shop: failed to list plans");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "")
        }
    }
}

pub async fn list_payment_methods<P, M, C>(
    State(state): State<Arc<ShopState<P, M, C>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
{
    match state.method_repo.list_enabled().await {
        Ok(methods) => Json(
            methods
                .into_iter()
                .map(PaymentMethodDto::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => {
            error!(db_error = ?err, "shop: failed to list payment methods");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "")
        }
    }
}

pub async fn check_coupon<P, M, C>(
    State(state): State<Arc<ShopState<P, M, C>>>,
    Json(request): Json<CheckCouponRequest>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    M: PaymentMethodRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
{
    let Some(period) = Period::from_str(&request.period) else {
        return error_response(StatusCode::BAD_REQUEST, "unknown billing period");
    };

    match state
        .coupons
        .check(&request.code, request.plan_id, period)
        .await
    {
        Ok(descriptor) => Json(descriptor).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
