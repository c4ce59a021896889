//! Schema migrations
//!
//! Migrations live in code and are tracked in the `_migrations` table. Each
//! one is applied together with its bookkeeping row in a single transaction.

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

use super::postgres::map_sqlx_error;

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// Applies and reverts migrations against PostgreSQL
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create migrations table", e))?;

        Ok(())
    }

    async fn is_applied(&self, version: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
            .bind(version)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to check migration status", e))
    }

    /// Apply a migration unless it is already recorded. Returns whether it ran.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to start migration", e))?;

        sqlx::raw_sql(&migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(&format!("Failed to run migration {}", migration.version), e))?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_sqlx_error(&format!("Failed to record migration {}", migration.version), e)
            })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit migration", e))?;

        info!(
            version = migration.version,
            description = %migration.description,
            "Applied migration"
        );

        Ok(true)
    }

    /// Revert a migration if it is recorded. Returns whether it ran.
    pub async fn revert_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        if !self.is_applied(migration.version).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to start revert", e))?;

        sqlx::raw_sql(&migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_sqlx_error(&format!("Failed to revert migration {}", migration.version), e)
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_sqlx_error(
                    &format!("Failed to remove migration record {}", migration.version),
                    e,
                )
            })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit revert", e))?;

        info!(version = migration.version, "Reverted migration");

        Ok(true)
    }

    /// Latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get migration version", e))
    }
}

/// The application schema, in ascending version order
pub fn schema_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
            "DROP TABLE IF EXISTS users;",
        ),
        Migration::new(
            2,
            "Create groups and memberships",
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                creator_id BIGINT NOT NULL REFERENCES users(id),
                balance NUMERIC NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS users_groups (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                group_id BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
                status TEXT NOT NULL
                    CHECK (status IN ('creator', 'admin', 'user', 'pending', 'blocked')),
                UNIQUE (user_id, group_id)
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_groups_one_creator
                ON users_groups(group_id) WHERE status = 'creator';
            CREATE INDEX IF NOT EXISTS idx_users_groups_group ON users_groups(group_id);
            "#,
            r#"
            DROP TABLE IF EXISTS users_groups;
            DROP TABLE IF EXISTS groups;
            "#,
        ),
        Migration::new(
            3,
            "Create operations ledger",
            r#"
            CREATE TABLE IF NOT EXISTS operations (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id),
                group_id BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'spending')),
                amount NUMERIC NOT NULL CHECK (amount > 0),
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_operations_group ON operations(group_id, id);
            "#,
            "DROP TABLE IF EXISTS operations;",
        ),
        Migration::new(
            4,
            "Create chat messages",
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id BIGSERIAL PRIMARY KEY,
                membership_id BIGINT NOT NULL REFERENCES users_groups(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                sent_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX IF NOT EXISTS idx_messages_membership ON messages(membership_id);
            "#,
            "DROP TABLE IF EXISTS messages;",
        ),
    ]
}

/// Apply every pending migration. Returns the number applied.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());
    let mut applied = 0;

    for migration in schema_migrations() {
        if migrator.run_migration(&migration).await? {
            applied += 1;
        }
    }

    Ok(applied)
}

/// Revert the most recently applied migration, if any
pub async fn revert_last_migration(pool: &PgPool) -> Result<Option<i64>, DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    let Some(version) = migrator.current_version().await? else {
        return Ok(None);
    };

    match schema_migrations().iter().find(|m| m.version == version) {
        Some(migration) => {
            migrator.revert_migration(migration).await?;
            Ok(Some(version))
        }
        None => Err(DomainError::internal(format!(
            "Applied migration {} is unknown to this build",
            version
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_migrations_order() {
        let migrations = schema_migrations();

        assert!(!migrations.is_empty());

        for pair in migrations.windows(2) {
            assert!(
                pair[1].version > pair[0].version,
                "Migrations should be in ascending order"
            );
        }
    }

    #[test]
    fn test_schema_migrations_content() {
        for migration in schema_migrations() {
            assert!(!migration.description.is_empty());
            assert!(!migration.up.trim().is_empty());
            assert!(!migration.down.trim().is_empty());
        }
    }

    #[test]
    fn test_single_creator_index() {
        let migrations = schema_migrations();
        let memberships = migrations
            .iter()
            .find(|m| m.up.contains("users_groups"))
            .unwrap();

        assert!(memberships.up.contains("WHERE status = 'creator'"));
        assert!(memberships.up.contains("UNIQUE (user_id, group_id)"));
    }
}
