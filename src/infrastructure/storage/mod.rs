//! Storage infrastructure - backends, pooling and migrations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::{InMemoryDatabase, Tables};
pub use migrations::{revert_last_migration, run_migrations, Migration, PostgresMigrator};
pub use postgres::{connect_pool, map_sqlx_error, PostgresConfig, PostgresProbe};
