//! PostgreSQL incident store
//!
//! Connects to an existing database holding the `incidents` table. The schema is
//! owned elsewhere; this service only reads. Pool settings:
//! - min/max connection bounds
//! - idle connection cleanup and lifetime cycling
//! - per-connection statement timeout
//! - session time zone pinned to UTC so `date_trunc` buckets are UTC

pub mod error;
pub mod filters;
pub mod repositories;
mod repository_impl;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_HEALTH_CHECK_INTERVAL_SECS,
};

/// PostgreSQL database service
///
/// Owns the connection pool. Created once at startup and shared by all handlers.
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Connect the pool using the configured bounds and timeouts
    ///
    /// Zero values fall back to defaults, except `statement_timeout_secs`
    /// where 0 disables the timeout.
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let options = connect_options(config)?;

        let max_connections = non_zero_or(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        let min_connections =
            non_zero_or(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS).min(max_connections);
        let acquire_timeout =
            non_zero_or(config.acquire_timeout_secs, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS);
        let idle_timeout = non_zero_or(config.idle_timeout_secs, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS);
        let max_lifetime = non_zero_or(config.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .connect_with(options)
            .await?;

        tracing::debug!(
            max_connections,
            min_connections,
            acquire_timeout_secs = acquire_timeout,
            idle_timeout_secs = idle_timeout,
            max_lifetime_secs = max_lifetime,
            statement_timeout_secs = config.statement_timeout_secs,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }

    /// Start a background `SELECT 1` probe, stopped by the shutdown signal
    pub fn start_health_check_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(POSTGRES_HEALTH_CHECK_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("PostgreSQL health check task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = sqlx::query("SELECT 1").execute(&db.pool).await {
                            tracing::warn!("PostgreSQL health check failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

/// Parse the URL and apply session settings
fn connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, PostgresError> {
    let url = config.url.as_str();
    if url.trim().is_empty() {
        return Err(PostgresError::Config("PostgreSQL URL is required".into()));
    }

    let mut options: PgConnectOptions = url
        .parse()
        .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

    options = options.log_statements(LevelFilter::Trace);

    let mut session = vec![("timezone", "UTC".to_string())];
    if config.statement_timeout_secs > 0 {
        session.push((
            "statement_timeout",
            format!("{}s", config.statement_timeout_secs),
        ));
    }
    Ok(options.options(session))
}

fn non_zero_or<T: PartialEq + Default + Copy>(value: T, default: T) -> T {
    if value == T::default() { default } else { value }
}
