// crates/backend-lib/src/error.rs

//! Central error type + Axum and GraphQL integration.
use async_graphql::ErrorExtensions;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StoreError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("You must be logged in to do that")]
    Unauthenticated,

    #[error("You don't have permission to do that")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This reset token is either invalid or expired")]
    ExpiredOrInvalidToken,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated
            | AppError::InvalidCredentials
            | AppError::ExpiredOrInvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(StoreError::UniqueViolation(_)) => StatusCode::CONFLICT,
            AppError::Storage(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated => "AUTH_001",
            AppError::Forbidden => "AUTH_002",
            AppError::InvalidCredentials => "AUTH_003",
            AppError::ExpiredOrInvalidToken => "AUTH_004",
            AppError::NotFound(_) => "NF_001",
            AppError::ValidationFailed(_) => "VAL_001",
            AppError::Storage(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Storage(StoreError::UniqueViolation(_)) => {
                "A record with that value already exists".to_string()
            },
            AppError::Storage(StoreError::NotFound(_)) => "Resource not found".to_string(),
            AppError::Storage(_) | AppError::Io(_) | AppError::Json(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
            // Policy errors are already safe to show to callers
            other => other.to_string(),
        }
    }

    /// True for errors caused by our own infrastructure rather than the caller
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationFailed(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if self.is_internal() {
            tracing::error!(code = self.error_code(), "request failed: {self}");
        }
        let code = self.error_code();
        async_graphql::Error::new(self.sanitized_message()).extend_with(|_, e| e.set("code", code))
    }
}
