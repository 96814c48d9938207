//! Error types for the product cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the product cache service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// No product exists for the requested id
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The cache backend could not be reached; callers degrade to a store read
    #[error("Cache backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The record store could not be reached
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Unrecognized or incomplete cache configuration
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Invalid request or record data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) | AppError::BackendUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::ConfigurationInvalid(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the product cache service.
pub type Result<T> = std::result::Result<T, AppError>;
