//! SolPay Server
//!
//! Payment links on Solana with settlement swaps: merchant dashboard API,
//! public payment-page API and admin signup.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::{AppState, load_catalog};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_DB_CONNECTIONS: u32 = 10;

/// Serve SolPay payment links, the merchant dashboard API and admin signup
#[derive(Parser, Debug)]
#[command(name = "solpay-server", version, about)]
struct Args {
    /// TOML file with [server], [admin] and [tokens]
    #[arg(short, long, env = "SOLPAY_CONFIG", default_value = "./solpay-config.toml")]
    config: PathBuf,

    /// Listen address, overriding `server.listen`
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Apply pending migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting solpay-server");

    let loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded = loader.load().inspect_err(|e| {
        tracing::error!(path = %args.config.display(), error = %e, "Invalid configuration");
    })?;
    let listen = loaded.server.listen;
    tracing::info!(
        path = %args.config.display(),
        public_base_url = %loaded.server.public_base_url,
        "Configuration loaded"
    );

    // The token list is fetched once here and again on every SIGHUP.
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let catalog = load_catalog(&http, loaded.tokens.list_url.as_ref()).await;
    tracing::info!(tokens = catalog.tokens().len(), "Token catalog ready");

    let pool = open_pool(args.migrate).await?;
    let state = AppState::new(pool.clone(), loaded.into_shared(), catalog, http);
    let stop_reload = spawn_config_reload_handler(state.clone(), loader);

    let served = run_server(build_router(state), listen).await;

    stop_reload.notify_one();
    pool.close().await;
    tracing::info!("solpay-server stopped");
    Ok(served?)
}

/// Connect to `DATABASE_URL`, applying the bundled migrations if asked to.
async fn open_pool(migrate: bool) -> anyhow::Result<PgPool> {
    let database_url = get_database_url()
        .inspect_err(|_| tracing::error!("DATABASE_URL is not set"))?;
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(&database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Database unreachable"))?;

    if migrate {
        let migrator = sqlx::migrate!("../migrations");
        migrator
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Migration failed"))?;
        tracing::info!(migrations = migrator.iter().count(), "Schema up to date");
    }
    Ok(pool)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_local_config_without_migrations() {
        let args = Args::try_parse_from(["solpay-server"]).unwrap();
        assert_eq!(args.config, PathBuf::from("./solpay-config.toml"));
        assert!(args.listen.is_none());
        assert!(!args.migrate);

        let args =
            Args::try_parse_from(["solpay-server", "-l", "127.0.0.1:9090", "--migrate"]).unwrap();
        assert_eq!(args.listen, Some("127.0.0.1:9090".parse().unwrap()));
        assert!(args.migrate);
    }
}
