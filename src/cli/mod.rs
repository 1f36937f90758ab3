use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::auth::TokenKeys;
use crate::config::{self, AppConfig};
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Parser)]
#[command(name = "devconnector-api")]
#[command(about = "DevConnector API - developer profiles and posts over REST")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations to DATABASE_URL and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port.unwrap_or(config.server.port)).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: &AppConfig, port: u16) -> anyhow::Result<()> {
    info!("Starting DevConnector API in {:?} mode", config.environment);

    let tokens = TokenKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)
        .context("JWT_SECRET must be set")?;

    let (store, pg): (Arc<dyn Store>, Option<PgStore>) = match &config.database.url {
        Some(url) => {
            info!("Using PostgreSQL store at {}", config.redacted_database_url().unwrap_or_default());
            let pg = PgStore::connect(url, &config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.run_migrations {
                pg.migrate().await.context("failed to apply migrations")?;
            }
            let store: Arc<dyn Store> = Arc::new(pg.clone());
            (store, Some(pg))
        }
        None => {
            if crate::is_production!() {
                bail!("DATABASE_URL is required in production");
            }
            warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    let app = crate::app(AppState::new(store, tokens));

    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("DevConnector API listening on http://{}", bind_addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error");

    close_pool(pg, served).await
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let Some(url) = &config.database.url else {
        bail!("DATABASE_URL must be set to run migrations");
    };

    let pg = PgStore::connect(url, &config.database)
        .await
        .context("failed to connect to database")?;
    let migrated = pg.migrate().await.context("failed to apply migrations");
    close_pool(Some(pg), migrated).await
}

/// Close the pool whatever `result` holds, then hand `result` back
async fn close_pool<T>(pg: Option<PgStore>, result: anyhow::Result<T>) -> anyhow::Result<T> {
    if let Some(pg) = pg {
        pg.close().await;
        info!("Closed database pool");
    }
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
