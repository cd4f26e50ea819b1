use anyhow::Result;

use super::config_model::{
    AuthSecret, BackendServer, Database, DotEnvyConfig, PaymentGateway, Provisioning, Recharge,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let payment_gateway = PaymentGateway {
        endpoint: std::env::var("PAYMENT_GATEWAY_ENDPOINT")
            .expect("PAYMENT_GATEWAY_ENDPOINT is invalid"),
        api_key: std::env::var("PAYMENT_GATEWAY_API_KEY")
            .expect("PAYMENT_GATEWAY_API_KEY is invalid"),
        callback_secret: std::env::var("PAYMENT_GATEWAY_CALLBACK_SECRET")
            .expect("PAYMENT_GATEWAY_CALLBACK_SECRET is invalid"),
        return_url: std::env::var("PAYMENT_GATEWAY_RETURN_URL")
            .expect("PAYMENT_GATEWAY_RETURN_URL is invalid"),
        request_timeout: std::env::var("PAYMENT_GATEWAY_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    let provisioning = Provisioning {
        webhook_url: std::env::var("PROVISIONING_WEBHOOK_URL")
            .ok()
            .filter(|value| !value.is_empty()),
    };

    let recharge = Recharge {
        min_amount: std::env::var("RECHARGE_MIN_AMOUNT")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()?,
        max_amount: std::env::var("RECHARGE_MAX_AMOUNT")
            .unwrap_or_else(|_| "1000000".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        payment_gateway,
        provisioning,
        recharge,
    })
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        secret: std::env::var("JWT_USER_SECRET").expect("JWT_USER_SECRET is invalid"),
    })
}
