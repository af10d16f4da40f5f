//! # GymDesk API Server
//!
//! Connects to PostgreSQL, applies pending migrations, and serves the router
//! until Ctrl-C.
//!
//! Set `LOG_FORMAT=json` for one JSON object per log line.
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/gymdesk JWT_SECRET=... cargo run -p gymdesk-api
//! ```

use gymdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use gymdesk_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, PoolSettings},
};
use gymdesk_shared::store::PgStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gymdesk_api=debug,gymdesk_shared=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("GymDesk API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool_settings = PoolSettings::new(config.database.url.clone())
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&pool_settings).await?;
    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
