//! PostgreSQL error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode query parameter: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
