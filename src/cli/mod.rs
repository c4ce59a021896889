//! CLI module for the shared finances service
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply (or revert) PostgreSQL schema migrations
//! - `check-ledger`: compare stored group balances with their ledgers

pub mod check_ledger;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Shared finances API - pooled group balances, operation ledger and chat
#[derive(Parser)]
#[command(name = "shared-finances")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),

    /// Apply pending schema migrations
    Migrate(migrate::MigrateArgs),

    /// Verify every group balance against its operations
    CheckLedger,
}

/// Read `.env` and the layered configuration, then start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from(["shared-finances", "serve", "--port", "8080", "--memory"])
            .unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.memory);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_migrate_and_check() {
        let cli = Cli::try_parse_from(["shared-finances", "migrate", "--revert"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate(args) if args.revert));

        let cli = Cli::try_parse_from(["shared-finances", "check-ledger"]).unwrap();
        assert!(matches!(cli.command, Command::CheckLedger));
    }

    #[test]
    fn test_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["shared-finances", "ui"]).is_err());
    }
}
