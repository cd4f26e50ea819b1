#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub payment_gateway: PaymentGateway,
    pub provisioning: Provisioning,
    pub recharge: Recharge,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PaymentGateway {
    pub endpoint: String,
    pub api_key: String,
    pub callback_secret: String,
    pub return_url: String,
    /// Seconds before an in-flight provider call is abandoned; the order
    /// stays pending and checkout can be retried.
    pub request_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Provisioning {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Recharge {
    pub min_amount: i32,
    pub max_amount: i32,
}

#[derive(Debug, Clone)]
pub struct AuthSecret {
    pub secret: String,
}
