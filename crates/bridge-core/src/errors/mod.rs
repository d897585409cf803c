// ABOUTME: Unified error handling with error codes and HTTP status mapping
// ABOUTME: AppError carries a code, a client-safe message, and an optional source
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling System
//!
//! Infrastructure errors (configuration, storage, local token handling) are
//! expressed as [`AppError`] with a stable [`ErrorCode`]. Protocol errors of the
//! OAuth bridge live next to the flow that raises them and convert into
//! `AppError` only when they need to cross that boundary.

/// Database error types
pub mod database;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use database::DatabaseError;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No credentials supplied
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials supplied but rejected
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Credentials expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,

    // Internal Errors (9000-9999)
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,
            Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether the message may be shown to clients verbatim
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        self.http_status() < 500
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error body shared by every endpoint of the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Client-safe error message
    pub error: String,
    /// Stable error code, omitted for protocol errors
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<ErrorCode>,
}

impl ErrorResponse {
    /// Build an error body from a client-safe message
    #[must_use]
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: None,
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        // Server-side failures never leak their message to the client
        let message = if error.code.is_client_error() {
            error.message.clone()
        } else {
            error.code.description().to_owned()
        };
        Self {
            success: false,
            error: message,
            code: Some(error.code),
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::{
        response::{IntoResponse, Response},
        Json,
    };
    use http::StatusCode;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(code = ?self.code, error = %self, "Request failed");
            }
            (status, Json(ErrorResponse::from(&self))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::AuthExpired.http_status(), 401);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_internal_message_is_not_exposed() {
        let error = AppError::internal("JWT encoding failed: key rejected");
        let body = ErrorResponse::from(&error);

        assert!(!body.success);
        assert_eq!(body.error, "An internal server error occurred");
        assert_eq!(body.code, Some(ErrorCode::InternalError));
    }

    #[test]
    fn test_client_message_is_kept() {
        let error = AppError::auth_invalid("Missing bearer token");
        let body = ErrorResponse::from(&error);

        assert_eq!(body.error, "Missing bearer token");
    }

    #[test]
    fn test_source_is_chained() {
        let error = AppError::internal("JWT encoding failed").with_source(fmt::Error);

        assert_eq!(error.code, ErrorCode::InternalError);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_error_response_serialization_omits_missing_code() {
        let json = serde_json::to_value(ErrorResponse::message("invalid code"))
            .unwrap_or_default();

        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "invalid code"})
        );
    }
}
