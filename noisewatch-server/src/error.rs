//! API error handling module
//!
//! Provides a unified error type for all API endpoints. The taxonomy the
//! client sees is deliberately small: validation errors (fix the input and
//! resubmit), storage errors (media upload or persistence failed, retrying
//! later is sensible), and not-found. The `code` field in every error body
//! lets clients tell the two apart programmatically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use noisewatch_core::ValidationError;

use crate::media_store::MediaStoreError;
use crate::report_store::StoreError;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found - requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable - required service is not configured or available
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Domain validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Report store failure
    #[error("Report store error: {0}")]
    Store(#[from] StoreError),

    /// External media storage failure
    #[error("Media store error: {0}")]
    Media(#[from] MediaStoreError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(ref e) => match e {
                // Validation surfaced through the store is still the client's problem
                StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                StoreError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Migration(_)
                | StoreError::Query(_)
                | StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // The upload collaborator failed, not this service
            Self::Media(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error code for programmatic error handling
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Store(ref e) => match e {
                StoreError::Validation(_) => "VALIDATION_ERROR",
                _ => "STORAGE_ERROR",
            },
            Self::Media(_) => "STORAGE_ERROR",
        }
    }

    /// Get sanitized error message for client response
    ///
    /// Validation messages are actionable and pass through verbatim; storage
    /// failures get a generic "try again" message with the detail kept in
    /// the server log only.
    fn client_message(&self) -> String {
        match self {
            Self::Store(StoreError::Validation(e)) => e.to_string(),
            Self::Store(_) => "Report storage failed, please try again later".to_string(),
            Self::Media(_) => "Media upload failed, please try again later".to_string(),
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Validation(_) => "validation",
            Self::Store(_) => "report_store",
            Self::Media(_) => "media_store",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        if status.is_client_error() {
            tracing::warn!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Client error"
            );
        } else {
            tracing::error!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                client_message = %client_message,
                "Server error"
            );
        }

        // All error responses carry `message` plus a `code` so clients can
        // decide between fix-and-resubmit and retry-later
        let body = serde_json::json!({
            "message": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
