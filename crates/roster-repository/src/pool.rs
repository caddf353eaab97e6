//! MySQL connection pool and its readiness probe.

use async_trait::async_trait;
use roster_config::DatabaseConfig;
use roster_core::{HealthCheck, HealthStatus, Interface, RosterError, RosterResult};
use shaku::Component;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Round trips slower than this are logged as a warning.
pub const SLOW_PING_THRESHOLD: Duration = Duration::from_millis(500);

/// Pool operations the repositories and the server depend on.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// The sqlx pool queries run against.
    fn inner(&self) -> &MySqlPool;

    /// Runs `SELECT 1`, failing if no connection can be acquired.
    async fn health_check(&self) -> RosterResult<()>;

    /// Applies pending migrations from `migrations/`.
    async fn run_migrations(&self) -> RosterResult<()>;

    /// Waits for checked-out connections, then closes the pool.
    async fn close(&self);
}

/// Shared MySQL pool, registered with Shaku as a component.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Opens a pool sized and timed by `config`.
    pub async fn connect(config: &DatabaseConfig) -> RosterResult<Self> {
        info!(
            max_connections = config.max_connections,
            "Opening MySQL connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("MySQL pool could not connect: {}", e);
                RosterError::Database(format!("Failed to connect: {e}"))
            })?;

        info!("MySQL connection pool ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> RosterResult<()> {
        let started = Instant::now();
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Database(format!("Health check failed: {e}")))?;

        let elapsed = started.elapsed();
        if elapsed > SLOW_PING_THRESHOLD {
            warn!(elapsed_ms = elapsed.as_millis() as u64, "Slow database ping");
        } else {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "Database ping");
        }
        Ok(())
    }

    async fn run_migrations(&self) -> RosterResult<()> {
        info!("Applying database migrations");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RosterError::Database(format!("Migration failed: {e}")))?;
        info!("Database schema is up to date");
        Ok(())
    }

    async fn close(&self) {
        info!("Draining MySQL connection pool");
        self.pool.close().await;
        info!("MySQL connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("open", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

/// Readiness probe backed by the database pool.
pub struct DatabaseHealthCheck {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl DatabaseHealthCheck {
    /// Probes the given pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealthCheck {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.pool.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}
