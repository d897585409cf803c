// ABOUTME: OAuth bridge between the identity provider and local sessions
// ABOUTME: Hosts the callback flow, identity reconciliation, code exchange, and their error type
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # OAuth Bridge
//!
//! - [`flow_manager`]: login redirect and the callback pipeline
//! - [`reconciler`]: maps a provider profile onto a local user
//! - [`exchange`]: redeems single-use exchange codes for local tokens
//!
//! Every failure is terminal for its request. [`OAuthError`] decides the HTTP
//! status and the client-facing message; detail is only logged.

/// Single-use exchange code redemption
pub mod exchange;
/// Login and callback orchestration
pub mod flow_manager;
/// Provider profile to local user reconciliation
pub mod reconciler;

pub use exchange::{CodeExchanger, ExchangeRequest, ExchangeResponse};
pub use flow_manager::{CallbackParams, FlowSettings, LoginRedirect, OAuthFlowManager};
pub use reconciler::{IdentityReconciler, ReconcileError};

use crate::providers::ProviderError;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bridge_core::errors::ErrorResponse;
use http::StatusCode;
use tracing::{error, warn};

/// OAuth bridge error types
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// CSRF state cookie missing or different from the `state` query parameter
    #[error("Invalid state parameter")]
    InvalidState,

    /// Authorization code could not be redeemed with the provider
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(#[source] ProviderError),

    /// Provider profile could not be fetched
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(#[source] ProviderError),

    /// Local user could not be found, created, or updated
    #[error("Reconciliation failed: {0}")]
    ReconciliationFailed(#[source] ReconcileError),

    /// Exchange session could not be stored
    #[error("Session issue failed: {0}")]
    SessionIssueFailed(String),

    /// Request body is not a valid exchange request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No unused session for the presented code
    #[error("Invalid exchange code")]
    InvalidCode,

    /// Session exists but is past its expiry
    #[error("Exchange code expired")]
    CodeExpired,

    /// Session points at a user that no longer exists
    #[error("User not found for exchange session")]
    UserNotFound,

    /// Local token could not be minted
    #[error("Token issue failed: {0}")]
    TokenIssueFailed(String),

    /// Any other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OAuthError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidState
            | Self::TokenExchangeFailed(_)
            | Self::ProfileFetchFailed(_)
            | Self::InvalidRequest(_)
            | Self::InvalidCode
            | Self::CodeExpired
            | Self::UserNotFound => StatusCode::BAD_REQUEST,
            Self::ReconciliationFailed(_)
            | Self::SessionIssueFailed(_)
            | Self::TokenIssueFailed(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client; never carries provider or store detail
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidState => "Invalid state parameter",
            Self::TokenExchangeFailed(_) => "Failed to exchange authorization code",
            Self::ProfileFetchFailed(_) => "Failed to get user information",
            Self::ReconciliationFailed(_) => "Failed to create user account",
            Self::SessionIssueFailed(_) => "failed to create oauth session",
            Self::InvalidRequest(_) => "invalid request",
            Self::InvalidCode => "invalid code",
            Self::CodeExpired => "code expired",
            Self::UserNotFound => "user not found",
            Self::TokenIssueFailed(_) => "token error",
            Self::Internal(_) => "internal error",
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "OAuth request failed");
        } else {
            warn!(error = %self, "OAuth request rejected");
        }
        (status, Json(ErrorResponse::message(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OAuthError::InvalidState.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(OAuthError::CodeExpired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            OAuthError::ReconciliationFailed(ReconcileError::MissingRole("member".to_owned()))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            OAuthError::TokenIssueFailed("x".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = OAuthError::ProfileFetchFailed(ProviderError::ApiError {
            provider: "mattermost".to_owned(),
            status_code: 401,
            message: "token abc123 revoked".to_owned(),
        });

        assert_eq!(err.public_message(), "Failed to get user information");
        assert!(err.to_string().contains("abc123"));
    }
}
