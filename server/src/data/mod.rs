//! Data storage layer
//!
//! - `postgres` - PostgreSQL incident store (production)
//! - `memory` - read-only snapshot loaded from a JSON seed file
//! - `types` - incident rows, aggregates and filter validation
//! - `traits` - `IncidentRepository`, implemented by every backend
//! - `error` - unified error type for all backends

pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use memory::MemoryStore;
pub use postgres::PostgresService;
pub use traits::IncidentRepository;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{DatabaseConfig, StoreBackend};

/// Incident store service enum
///
/// Wraps the backend-specific service. Services are stored as `Arc` so the
/// repository trait object can share them with request handlers.
pub enum StoreService {
    /// PostgreSQL backend (default)
    Postgres(Arc<PostgresService>),
    /// In-memory snapshot
    Memory(Arc<MemoryStore>),
}

impl StoreService {
    /// Initialize the store based on configuration
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        match config.store {
            StoreBackend::Postgres => {
                let pg = config.postgres.as_ref().ok_or_else(|| {
                    DataError::Config("PostgreSQL configuration required".to_string())
                })?;
                let service = PostgresService::init(pg).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
            StoreBackend::Memory => {
                let store = match &config.seed_path {
                    Some(path) => MemoryStore::load(path).await?,
                    None => MemoryStore::new(Vec::new()),
                };
                Ok(Self::Memory(Arc::new(store)))
            }
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Postgres(_) => StoreBackend::Postgres,
            Self::Memory(_) => StoreBackend::Memory,
        }
    }

    /// Get the repository trait object for incident queries
    pub fn repository(&self) -> Box<dyn IncidentRepository + Send + Sync> {
        match self {
            Self::Postgres(p) => Box::new(Arc::clone(p)),
            Self::Memory(m) => Box::new(Arc::clone(m)),
        }
    }

    /// Close the store gracefully
    pub async fn close(&self) {
        match self {
            Self::Postgres(p) => p.close().await,
            Self::Memory(_) => {}
        }
    }

    /// Start the background health probe (PostgreSQL only)
    pub fn start_health_check_task(
        &self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        match self {
            Self::Postgres(p) => Some(p.start_health_check_task(shutdown_rx)),
            Self::Memory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::IncidentFilter;

    fn memory_config(seed_path: Option<std::path::PathBuf>) -> DatabaseConfig {
        DatabaseConfig {
            store: StoreBackend::Memory,
            seed_path,
            postgres: None,
        }
    }

    #[tokio::test]
    async fn test_init_memory_without_seed_is_empty() {
        let store = StoreService::init(&memory_config(None)).await.unwrap();
        assert_eq!(store.backend(), StoreBackend::Memory);
        assert_eq!(store.repository().ping().await.unwrap(), 0);

        let (_tx, rx) = watch::channel(false);
        assert!(store.start_health_check_task(rx).is_none());
        store.close().await;
    }

    #[tokio::test]
    async fn test_init_memory_missing_seed_fails() {
        let result =
            StoreService::init(&memory_config(Some("/nonexistent/seed.json".into()))).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[tokio::test]
    async fn test_init_memory_with_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "event_time": "2024-01-01T00:00:00Z", "sector_code": "A1",
                 "direction": "N", "source_type": "OTHER", "intensity": 1}]"#,
        )
        .unwrap();

        let store = StoreService::init(&memory_config(Some(path))).await.unwrap();
        let repo = store.repository();
        assert_eq!(repo.count(&IncidentFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_init_postgres_requires_config() {
        let config = DatabaseConfig {
            store: StoreBackend::Postgres,
            seed_path: None,
            postgres: None,
        };
        let result = StoreService::init(&config).await;
        assert!(matches!(result, Err(DataError::Config(_))));
    }
}
