// Wallet ledger server
// Lists recent wallet transactions and records new ones against a Postgres store

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wallet_ledger::config::{Config, LogFormat};
use wallet_ledger::database::{redact_url, Database, PgLedgerStore};
use wallet_ledger::Ledger;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format)?;

    info!("Starting wallet ledger server");
    info!("Configuration:");
    info!("  Database: {}", redact_url(&config.database_url));
    info!("  Wallet ID: {}", config.wallet_id);
    info!("  Transaction types: {}", config.policy.transaction_types.join(", "));
    info!("  Allow overdraft: {}", config.policy.allow_overdraft);
    info!("  Server Port: {}", config.port);

    let pool = Database::init(
        &config.database_url,
        config.max_connections,
        config.run_migrations,
    )
    .await?;

    let store = Arc::new(PgLedgerStore::new(pool.clone()));
    let ledger = Ledger::new(store, config.wallet_id, config.policy.clone());
    let app = wallet_ledger::app(ledger);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Wallet ledger listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    pool.close().await;
    info!("Wallet ledger stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("wallet_ledger=info,tower_http=info,sqlx=warn"))
        .context("Invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
