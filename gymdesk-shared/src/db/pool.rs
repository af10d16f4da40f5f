/// PostgreSQL connection pool
///
/// ```no_run
/// use gymdesk_shared::db::pool::{create_pool, PoolSettings};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(&PoolSettings::new("postgresql://gymdesk@localhost/gymdesk")).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Pool sizing and connection lifetimes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,

    /// How long a handler may wait for a free connection
    pub acquire_timeout: Duration,

    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolSettings {
    /// Ten connections, five second acquire timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }
}

/// Connects and runs a round trip before handing the pool out
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = settings.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect(&settings.url)
        .await?;

    health_check(&pool).await?;
    Ok(pool)
}

/// One `SELECT 1` round trip
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    debug!("Database reachable");
    Ok(())
}

pub async fn close_pool(pool: PgPool) {
    info!("Closing database connections");
    pool.close().await;
}
