use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::pricing::PricingCalculator,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{
    domain::value_objects::pricing::PricingConfig,
    infra::db::postgres::postgres_connection::PgPoolSquad,
    notify::ProvisioningWebhook,
    observability::alerts::AlertNotifier,
    payments::gateway_client::GatewayClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use url::Url;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let pricing = Arc::new(PricingCalculator::new(PricingConfig {
        recharge_min: config.recharge.min_amount,
        recharge_max: config.recharge.max_amount,
        ..PricingConfig::default()
    }));

    let gateway = Arc::new(GatewayClient::new(
        config.payment_gateway.endpoint.clone(),
        config.payment_gateway.api_key.clone(),
        config.payment_gateway.callback_secret.clone(),
        config.payment_gateway.return_url.clone(),
        config.payment_gateway.request_timeout,
    )?);

    let provisioning_url = config
        .provisioning
        .webhook_url
        .as_deref()
        .map(Url::parse)
        .transpose()?;
    let provisioning = Arc::new(ProvisioningWebhook::new(provisioning_url));

    let alerts = AlertNotifier::from_env();

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/shop", routers::shop::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/v1/orders",
            routers::orders::routes(
                Arc::clone(&db_pool),
                Arc::clone(&pricing),
                Arc::clone(&gateway),
                Arc::clone(&provisioning),
            ),
        )
        .nest(
            "/api/v1/recharge",
            routers::recharge::routes(Arc::clone(&db_pool), Arc::clone(&pricing)),
        )
        .nest(
            "/api/v1/notify",
            routers::payment_notify::routes(
                Arc::clone(&db_pool),
                Arc::clone(&gateway),
                Arc::clone(&provisioning),
                alerts,
            ),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
