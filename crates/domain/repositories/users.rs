use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

/// External user directory. Registration mechanics (verification codes, IP
/// limits, credential storage) live outside this subsystem; the order flow
/// only needs a stable user id back.
#[async_trait]
#[automock]
pub trait UserDirectory {
    async fn resolve_or_register(&self, email: &str, password: &str) -> Result<Uuid>;
}
