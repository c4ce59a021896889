//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::storage::{StorageConfig, StorageFactory};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on, overriding `server.port`
    #[arg(long)]
    pub port: Option<u16>,

    /// Keep everything in memory instead of PostgreSQL
    #[arg(long)]
    pub memory: bool,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = super::bootstrap()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }

    let storage = if args.memory {
        StorageConfig::in_memory()
    } else {
        config.storage_config()?
    };

    let repos = StorageFactory::create(&storage).await?;
    let app = create_router(AppState::new(repos), config.server.debug);

    let addr = build_socket_addr(&config)?;
    info!(
        backend = storage.storage_type().as_str(),
        debug = config.server.debug,
        "Starting server on {}",
        addr
    );

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 4000;

        let addr = build_socket_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "not an ip".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
