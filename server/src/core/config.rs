use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_CORS_ORIGINS, DEFAULT_HOST, DEFAULT_PORT,
    ENV_DATABASE_URL, ENV_SEED, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MAX_LIFETIME_SECS, POSTGRES_DEFAULT_MIN_CONNECTIONS,
    POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

// =============================================================================
// Store Backend Enum
// =============================================================================

/// Backend holding the incident records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Read-only snapshot loaded from a JSON seed file
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// CORS configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CorsFileConfig {
    /// Allowed origins; `["*"]` allows any origin
    pub origins: Option<Vec<String>>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use DATABASE_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 10)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 1)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 30)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub store: Option<StoreBackend>,
    pub seed_path: Option<String>,
    pub postgres: Option<PostgresFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub cors: Option<CorsFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // CORS
        if let Some(cors) = other.cors {
            let current = self.cors.get_or_insert_with(CorsFileConfig::default);
            if cors.origins.is_some() {
                tracing::trace!(origins = ?cors.origins, "Merging cors.origins");
                current.origins = cors.origins;
            }
        }

        // Database (with nested postgres)
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.store.is_some() {
                tracing::trace!(store = ?database.store, "Merging database.store");
                current.store = database.store;
            }
            if database.seed_path.is_some() {
                tracing::trace!(seed_path = ?database.seed_path, "Merging database.seed_path");
                current.seed_path = database.seed_path;
            }
            if let Some(pg) = database.postgres {
                let current_pg = current
                    .postgres
                    .get_or_insert_with(PostgresFileConfig::default);
                if pg.url.is_some() {
                    tracing::trace!("Merging database.postgres.url");
                    current_pg.url = pg.url;
                }
                if pg.max_connections.is_some() {
                    current_pg.max_connections = pg.max_connections;
                }
                if pg.min_connections.is_some() {
                    current_pg.min_connections = pg.min_connections;
                }
                if pg.acquire_timeout_secs.is_some() {
                    current_pg.acquire_timeout_secs = pg.acquire_timeout_secs;
                }
                if pg.idle_timeout_secs.is_some() {
                    current_pg.idle_timeout_secs = pg.idle_timeout_secs;
                }
                if pg.max_lifetime_secs.is_some() {
                    current_pg.max_lifetime_secs = pg.max_lifetime_secs;
                }
                if pg.statement_timeout_secs.is_some() {
                    current_pg.statement_timeout_secs = pg.statement_timeout_secs;
                }
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (credentials are not allowed)
    Any,
    /// Explicit allow-list (credentials allowed)
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated list of origins
    pub fn parse(s: &str) -> Self {
        if s.trim() == "*" {
            return Self::Any;
        }
        Self::from_list(s.split(','))
    }

    /// Build from individual origin entries; a `*` entry means any origin
    pub fn from_list<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for origin in origins {
            let origin = origin.as_ref().trim();
            if origin == "*" {
                return Self::Any;
            }
            if !origin.is_empty() {
                list.push(origin.to_string());
            }
        }
        Self::List(list)
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origins: CorsOrigins,
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub store: StoreBackend,
    /// Seed file for the memory store
    pub seed_path: Option<PathBuf>,
    /// Present when `store` is postgres
    pub postgres: Option<PostgresConfig>,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.incidents/incidents.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.incidents/incidents.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            store = %config.database.store,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn resolve(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_cors = file_config.cors.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_postgres = file_database.postgres.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // cors: CLI/env string overrides file list, default any origin
        let origins = match (&cli.cors_origins, file_cors.origins) {
            (Some(s), _) => CorsOrigins::parse(s),
            (None, Some(list)) => CorsOrigins::from_list(list),
            (None, None) => CorsOrigins::parse(DEFAULT_CORS_ORIGINS),
        };

        let store = cli.store.or(file_database.store).unwrap_or_default();

        let seed_path = cli
            .seed
            .clone()
            .or_else(|| file_database.seed_path.map(|p| expand_path(&p)));

        let postgres = if store == StoreBackend::Postgres {
            Some(PostgresConfig {
                url: cli
                    .database_url
                    .clone()
                    .or(file_postgres.url)
                    .unwrap_or_default(),
                max_connections: file_postgres
                    .max_connections
                    .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
                min_connections: file_postgres
                    .min_connections
                    .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
                acquire_timeout_secs: file_postgres
                    .acquire_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
                idle_timeout_secs: file_postgres
                    .idle_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
                max_lifetime_secs: file_postgres
                    .max_lifetime_secs
                    .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
                statement_timeout_secs: file_postgres
                    .statement_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
            })
        } else {
            None
        };

        Self {
            server: ServerConfig { host, port },
            cors: CorsConfig { origins },
            database: DatabaseConfig {
                store,
                seed_path,
                postgres,
            },
        }
    }

    /// Validate the merged configuration
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be non-zero");
        }

        match self.database.store {
            StoreBackend::Postgres => {
                let url_missing = self
                    .database
                    .postgres
                    .as_ref()
                    .is_none_or(|pg| pg.url.trim().is_empty());
                if url_missing {
                    anyhow::bail!(
                        "Configuration error: a PostgreSQL URL is required when database.store is 'postgres'. \
                         Set via {} env var, --database-url, or database.postgres.url in config file.",
                        ENV_DATABASE_URL
                    );
                }
            }
            StoreBackend::Memory => {
                if self.database.seed_path.is_none() {
                    tracing::warn!(
                        "Memory store has no seed file ({} or database.seed_path); serving an empty data set",
                        ENV_SEED
                    );
                }
            }
        }

        if let CorsOrigins::List(list) = &self.cors.origins
            && list.is_empty()
        {
            tracing::warn!("CORS allow-list is empty; browser clients will be rejected");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.incidents/incidents.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_serde() {
        let backend: StoreBackend = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(backend, StoreBackend::Postgres);

        let backend: StoreBackend = serde_json::from_str(r#""memory""#).unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }

    #[test]
    fn test_store_backend_display() {
        assert_eq!(StoreBackend::Postgres.to_string(), "postgres");
        assert_eq!(StoreBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_cors_origins_parse() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(" * "), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("http://localhost:5173, http://127.0.0.1:5173,"),
            CorsOrigins::List(vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ])
        );
        assert_eq!(CorsOrigins::parse(""), CorsOrigins::List(vec![]));
    }

    #[test]
    fn test_cors_origins_list_with_wildcard_entry() {
        assert_eq!(
            CorsOrigins::from_list(["http://a.example", "*"]),
            CorsOrigins::Any
        );
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "cors": { "origins": ["http://localhost:5173"] },
            "database": {
                "store": "postgres",
                "postgres": { "url": "postgres://localhost/incidents", "max_connections": 4 }
            }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.store, Some(StoreBackend::Postgres));
        let pg = database.postgres.as_ref().unwrap();
        assert_eq!(pg.url.as_deref(), Some("postgres://localhost/incidents"));
        assert_eq!(pg.max_connections, Some(4));
        assert!(pg.statement_timeout_secs.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            server: Some(ServerFileConfig {
                host: Some("base.host".to_string()),
                port: Some(1000),
            }),
            cors: None,
            database: Some(DatabaseFileConfig {
                store: Some(StoreBackend::Postgres),
                seed_path: None,
                postgres: Some(PostgresFileConfig {
                    url: Some("postgres://base/db".to_string()),
                    max_connections: Some(5),
                    ..Default::default()
                }),
            }),
            extra: serde_json::Value::Null,
        };

        let overlay = FileConfig {
            server: Some(ServerFileConfig {
                host: None,
                port: Some(2000),
            }),
            cors: Some(CorsFileConfig {
                origins: Some(vec!["http://overlay".to_string()]),
            }),
            database: Some(DatabaseFileConfig {
                store: None,
                seed_path: None,
                postgres: Some(PostgresFileConfig {
                    statement_timeout_secs: Some(5),
                    ..Default::default()
                }),
            }),
            extra: serde_json::Value::Null,
        };

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host, Some("base.host".to_string()));
        assert_eq!(server.port, Some(2000));
        assert_eq!(
            base.cors.as_ref().unwrap().origins,
            Some(vec!["http://overlay".to_string()])
        );

        let database = base.database.as_ref().unwrap();
        assert_eq!(database.store, Some(StoreBackend::Postgres));
        let pg = database.postgres.as_ref().unwrap();
        assert_eq!(pg.url.as_deref(), Some("postgres://base/db"));
        assert_eq!(pg.max_connections, Some(5));
        assert_eq!(pg.statement_timeout_secs, Some(5));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.cors.origins, CorsOrigins::Any);
        assert_eq!(config.database.store, StoreBackend::Postgres);

        let pg = config.database.postgres.as_ref().unwrap();
        assert!(pg.url.is_empty());
        assert_eq!(pg.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            pg.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "server": { "host": "0.0.0.0", "port": 9000 },
                "cors": { "origins": ["http://file.example"] },
                "database": { "postgres": { "url": "postgres://file/db" } }
            }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(9100),
            database_url: Some("postgres://cli/db".to_string()),
            cors_origins: Some("http://cli.example".to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, file);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.cors.origins,
            CorsOrigins::List(vec!["http://cli.example".to_string()])
        );
        assert_eq!(
            config.database.postgres.as_ref().unwrap().url,
            "postgres://cli/db"
        );
    }

    #[test]
    fn test_resolve_memory_store_has_no_postgres_section() {
        let cli = CliConfig {
            store: Some(StoreBackend::Memory),
            seed: Some(PathBuf::from("/tmp/seed.json")),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, FileConfig::default());

        assert_eq!(config.database.store, StoreBackend::Memory);
        assert!(config.database.postgres.is_none());
        assert_eq!(
            config.database.seed_path,
            Some(PathBuf::from("/tmp/seed.json"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_postgres_url() {
        let config = AppConfig::resolve(&CliConfig::default(), FileConfig::default());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PostgreSQL URL is required"));
    }

    #[test]
    fn test_load_from_cli_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{ "server": { "port": 8123 }, "database": { "store": "memory" } }"#,
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.database.store, StoreBackend::Memory);
    }

    #[test]
    fn test_load_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/incidents-config.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
