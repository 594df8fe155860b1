//! Shared API types
//!
//! Error responses and pagination shared by all endpoints.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use validator::ValidationError;

use crate::core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::data::types::ValidationError as FilterValidationError;

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for page_size parameter
pub fn validate_page_size(page_size: u32) -> Result<(), ValidationError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::new("page_size_range")
            .with_message(format!("page_size must be 1..{}", MAX_PAGE_SIZE).into()));
    }
    Ok(())
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    Validation { code: String, message: String },
    NotFound { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: crate::data::DataError) -> Self {
        tracing::error!(
            error = %e,
            backend = e.backend(),
            transient = e.is_transient(),
            "Data error"
        );
        Self::internal("Database operation failed")
    }
}

impl From<FilterValidationError> for ApiError {
    fn from(e: FilterValidationError) -> Self {
        Self::validation(e.code(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::Validation { code, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                code,
                message,
            ),
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Paginated listing: page metadata plus the page's items
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    /// Never below 1, even for an empty result
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(u64::from(page_size.max(1))).max(1),
            items,
        }
    }
}
