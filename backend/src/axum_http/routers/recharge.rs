use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::orders::OrderRepository,
        value_objects::recharge::CreateRechargeRequest,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::orders::OrderPostgres,
    },
};

use crate::auth::AuthUser;
use crate::axum_http::error_responses::error_response;
use crate::usecases::{pricing::PricingCalculator, recharge::RechargeUseCase};

pub fn routes(db_pool: Arc<PgPoolSquad>, pricing: Arc<PricingCalculator>) -> Router {
    let recharge_usecase = Arc::new(RechargeUseCase::new(
        Arc::new(OrderPostgres::new(Arc::clone(&db_pool))),
        pricing,
    ));

    Router::new()
        .route("/", post(create_recharge))
        .route("/bonus-config", get(bonus_config))
        .with_state(recharge_usecase)
}

pub async fn create_recharge<O>(
    State(recharge_usecase): State<Arc<RechargeUseCase<O>>>,
    auth: AuthUser,
    Json(request): Json<CreateRechargeRequest>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
{
    match recharge_usecase
        .create_recharge(auth.user_id, request.amount)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn bonus_config<O>(
    State(recharge_usecase): State<Arc<RechargeUseCase<O>>>,
) -> impl IntoResponse
where
    O: OrderRepository + Send + Sync + 'static,
{
    Json(recharge_usecase.bonus_tiers()).into_response()
}
