//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unique constraint guarding one vote row per (user, contestant)
const VOTE_UNIQUE_CONSTRAINT: &str = "votes_user_contestant_key";

/// Partial unique index guarding one active entry per (user, arena)
const ACTIVE_ENTRY_UNIQUE_CONSTRAINT: &str = "contestants_active_user_arena_key";

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Token economy errors
    #[error("Insufficient tokens: {required} required, {available} available")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Already joined this arena")]
    AlreadyJoined,

    #[error("Already voted for this contestant; spend tokens for an extra vote")]
    AlreadyVoted,

    #[error("Arena is full")]
    ArenaFull,

    #[error("No token package with {0} tokens")]
    InvalidPackage(i64),

    // Payment provider errors
    #[error("Payment provider unavailable: {0}")]
    PaymentProviderUnavailable(String),

    #[error("Invalid payment notification signature")]
    PaymentSignatureInvalid,

    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // External service errors
    #[error("Redis error: {0}")]
    Redis(String),

    // Rate limiting
    #[error("Too many requests")]
    TooManyRequests,

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::ArenaFull => "ARENA_FULL",
            Self::InvalidPackage(_) => "INVALID_PACKAGE",
            Self::PaymentProviderUnavailable(_) => "PAYMENT_PROVIDER_UNAVAILABLE",
            Self::PaymentSignatureInvalid => "PAYMENT_SIGNATURE_INVALID",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Redis(_) => "REDIS_ERROR",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::AlreadyJoined | Self::AlreadyVoted | Self::ArenaFull => StatusCode::CONFLICT,
            Self::InvalidPackage(_) | Self::PaymentSignatureInvalid => StatusCode::BAD_REQUEST,
            Self::PaymentProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Database(_) | Self::Redis(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Structured details attached to the response body, if any
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::InsufficientFunds {
                required,
                available,
            } => Some(serde_json::json!({
                "required": required,
                "available": available,
            })),
            Self::AlreadyVoted => Some(serde_json::json!({ "paid_vote_available": true })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::PaymentProviderUnavailable(e) => {
                tracing::warn!("Payment provider error: {}", e);
                "The payment provider is currently unavailable".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    match db_err.constraint() {
                        Some(VOTE_UNIQUE_CONSTRAINT) => AppError::AlreadyVoted,
                        Some(ACTIVE_ENTRY_UNIQUE_CONSTRAINT) => AppError::AlreadyJoined,
                        _ => AppError::AlreadyExists("Resource already exists".to_string()),
                    }
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Redis(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
