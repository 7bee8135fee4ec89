//! Server binary: loads config from env, connects to PostgreSQL, optionally
//! creates the `users` table, and serves the API.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use users_api::{app, connect, AppState, Config, PgUserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("users_api=info,tower_http=info"));
    if config.db.logging {
        filter = filter.add_directive("sqlx::query=debug".parse()?);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = config.db.connect_options()?;
    let pool = match connect(options, config.db.max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            std::process::exit(1);
        }
    };
    tracing::info!("database connection established");

    let store = PgUserStore::new(pool);
    if config.db.synchronize {
        store.ensure_schema().await?;
        tracing::info!("users table synchronized");
    }

    let state = AppState::new(Arc::new(store));
    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
