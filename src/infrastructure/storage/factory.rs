//! Runtime selection of the storage backend

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::domain::chat::MessageRepository;
use crate::domain::group::GroupRepository;
use crate::domain::ledger::LedgerRepository;
use crate::domain::membership::MembershipRepository;
use crate::domain::storage::StoreProbe;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::chat::{InMemoryMessageRepository, PostgresMessageRepository};
use crate::infrastructure::group::{InMemoryGroupRepository, PostgresGroupRepository};
use crate::infrastructure::ledger::{InMemoryLedgerRepository, PostgresLedgerRepository};
use crate::infrastructure::membership::{
    InMemoryMembershipRepository, PostgresMembershipRepository,
};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::in_memory::InMemoryDatabase;
use super::migrations::run_migrations;
use super::postgres::{connect_pool, PostgresConfig, PostgresProbe};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Process-local tables (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the services need, bound to one store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub probe: Arc<dyn StoreProbe>,
}

impl Repositories {
    /// Repositories over a fresh in-memory table set
    pub fn in_memory() -> Self {
        Self::with_database(Arc::new(InMemoryDatabase::new()))
    }

    /// Repositories over an existing in-memory table set
    pub fn with_database(db: Arc<InMemoryDatabase>) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new(db.clone())),
            groups: Arc::new(InMemoryGroupRepository::new(db.clone())),
            memberships: Arc::new(InMemoryMembershipRepository::new(db.clone())),
            ledger: Arc::new(InMemoryLedgerRepository::new(db.clone())),
            messages: Arc::new(InMemoryMessageRepository::new(db.clone())),
            probe: db,
        }
    }

    /// Repositories over a PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            memberships: Arc::new(PostgresMembershipRepository::new(pool.clone())),
            ledger: Arc::new(PostgresLedgerRepository::new(pool.clone())),
            messages: Arc::new(PostgresMessageRepository::new(pool.clone())),
            probe: Arc::new(PostgresProbe::new(pool)),
        }
    }
}

/// Factory for creating the repository set
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build repositories for the configured backend. PostgreSQL pools are
    /// migrated before use.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                let applied = run_migrations(&pool).await?;
                info!(applied, "Using PostgreSQL storage");
                Ok(Repositories::postgres(pool))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("in-memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("Postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_factory_builds_in_memory_repositories() {
        let repos = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        assert_eq!(repos.probe.backend(), "memory");
        assert!(repos.probe.ping().await.is_ok());
    }
}
