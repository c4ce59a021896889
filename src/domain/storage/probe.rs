//! Store reachability probe

use async_trait::async_trait;

use crate::domain::DomainError;

/// Something that can tell whether the backing store answers
#[async_trait]
pub trait StoreProbe: Send + Sync {
    /// Backend name reported by health checks
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DomainError>;
}
