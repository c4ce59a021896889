//! Migrate command - applies or reverts PostgreSQL schema migrations

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{
    connect_pool, revert_last_migration, run_migrations, StorageConfig,
};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let StorageConfig::Postgres(pg_config) = config.storage_config()? else {
        bail!("migrations need the postgres storage backend");
    };

    let pool = connect_pool(&pg_config).await?;

    if args.revert {
        match revert_last_migration(&pool).await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migration to revert"),
        }
    } else {
        let applied = run_migrations(&pool).await?;
        info!(applied, "Migrations up to date");
    }

    pool.close().await;
    Ok(())
}
