// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Incidents";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "incidents";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".incidents";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "incidents.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "INCIDENTS_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "INCIDENTS_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "INCIDENTS_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "INCIDENTS_LOG";

/// Environment variable for the CORS allow-list (`*` or comma-separated origins)
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";

// =============================================================================
// Environment Variables - Store
// =============================================================================

/// Environment variable for the incident store backend (postgres or memory)
pub const ENV_STORE: &str = "INCIDENTS_STORE";

/// Environment variable for the PostgreSQL connection URL
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Environment variable for the memory store seed file (JSON array of incidents)
pub const ENV_SEED: &str = "INCIDENTS_SEED";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default CORS allow-list (any origin)
pub const DEFAULT_CORS_ORIGINS: &str = "*";

/// Graceful shutdown timeout for background tasks
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PostgreSQL Database
// =============================================================================

/// Default maximum connections in the pool
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default minimum connections kept warm
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// Default connection acquire timeout in seconds
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Default idle connection timeout in seconds
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default max connection lifetime in seconds
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;

/// Default statement timeout in seconds
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 30;

/// Interval between background `SELECT 1` probes
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;

// =============================================================================
// Incident Query Limits
// =============================================================================

/// Default page number for incident listings
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for incident listings
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Maximum page size for incident listings
pub const MAX_PAGE_SIZE: u32 = 200;

/// Maximum length of a sector code
pub const MAX_SECTOR_LENGTH: usize = 32;

/// Lowest valid intensity
pub const MIN_INTENSITY: i64 = 1;

/// Highest valid intensity
pub const MAX_INTENSITY: i64 = 5;
