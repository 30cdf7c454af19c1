// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and error code
#[derive(Error, Debug)]
pub enum PickerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Maps API key not configured")]
    NotConfigured,

    #[error("Could not geocode address: {0}")]
    GeocodeFailed(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Carries the user-facing (localized) message
    #[error("{0}")]
    SearchFailed(String),
}

impl PickerError {
    fn error_code(&self) -> &'static str {
        match self {
            PickerError::InvalidInput(_) => "INVALID_INPUT",
            PickerError::ValidationError(_) => "VALIDATION_ERROR",
            PickerError::Unauthorized => "UNAUTHORIZED",
            PickerError::Forbidden => "FORBIDDEN",
            PickerError::NotConfigured => "NOT_CONFIGURED",
            PickerError::GeocodeFailed(_) => "GEOCODE_FAILED",
            PickerError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            PickerError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            PickerError::SearchFailed(_) => "SEARCH_FAILED",
        }
    }
}

/// Convert PickerError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PickerError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PickerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PickerError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PickerError::Unauthorized => StatusCode::UNAUTHORIZED,
            PickerError::Forbidden => StatusCode::FORBIDDEN,
            PickerError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            PickerError::GeocodeFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PickerError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            PickerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            PickerError::SearchFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
