//! Unified error type for the data layer
//!
//! Wraps failures from every store backend (PostgreSQL, memory) so the API
//! layer maps them to a single 500 response.

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// PostgreSQL query or connection error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// A filter value could not be encoded as a query parameter
    #[error("Failed to encode query parameter: {0}")]
    Encode(String),

    /// Seed file could not be parsed
    #[error("Invalid seed file {path}: {error}")]
    Seed { path: String, error: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Postgres(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) | Self::Encode(_) => "postgres",
            Self::Seed { .. } => "memory",
            Self::Config(_) | Self::Io(_) => "unknown",
        }
    }
}

impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::Postgres(e),
            crate::data::postgres::PostgresError::Encode(msg) => Self::Encode(msg),
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::PostgresError;

    #[test]
    fn test_seed_error_display() {
        let err = DataError::Seed {
            path: "seed.json".to_string(),
            error: "expected value at line 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid seed file seed.json: expected value at line 1"
        );
        assert_eq!(err.backend(), "memory");
    }

    #[test]
    fn test_from_postgres_error() {
        let err: DataError = PostgresError::Config("missing URL".to_string()).into();
        assert!(matches!(err, DataError::Config(ref m) if m == "missing URL"));

        let err: DataError = PostgresError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.backend(), "postgres");
        assert!(err.is_transient());
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::Postgres(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::Postgres(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
    }
}
