//! Subscription tracker: API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use subtrack_core::error::DomainError;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the service binaries.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Span exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// A startup job failed in the domain layer.
    #[error("startup error: {0}")]
    Domain(#[from] DomainError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::Validation(format!(
            "malformed request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            DomainError::SubscriptionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "subscription_not_found",
                self.0.to_string(),
            ),
            DomainError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.0.to_string(),
            ),
            // Infrastructure details stay in the logs.
            DomainError::Unavailable(detail) => {
                error!(detail = %detail, "request failed on an unavailable dependency");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "service temporarily unavailable".to_owned(),
                )
            }
            DomainError::Serialization(detail) => {
                error!(detail = %detail, "request failed on serialization");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_owned(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: error_code,
                message,
            }),
        )
            .into_response()
    }
}
