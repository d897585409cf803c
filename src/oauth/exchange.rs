// ABOUTME: Redeems single-use exchange codes for a local session token and user profile
// ABOUTME: Expiry is checked before issuance; the used flag flips atomically after it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::OAuthError;
use crate::auth::AuthManager;
use crate::database::{ExchangeSessionRepository, UserRepository};
use crate::logging::AppLogger;
use bridge_core::models::UserSummary;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Body of `POST /auth/exchange`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRequest {
    /// Exchange code from the frontend redirect
    #[serde(default)]
    pub code: String,
}

/// Successful exchange payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// Always true
    pub success: bool,
    /// Local user with expanded roles
    pub user: UserSummary,
    /// Local session token
    pub token: String,
}

/// Turns exchange codes into local sessions
pub struct CodeExchanger {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn ExchangeSessionRepository>,
    auth: Arc<AuthManager>,
}

impl CodeExchanger {
    /// Create an exchanger
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn ExchangeSessionRepository>,
        auth: Arc<AuthManager>,
    ) -> Self {
        Self {
            users,
            sessions,
            auth,
        }
    }

    /// Redeem `code`
    ///
    /// An expired session is rejected and left unmarked. If another request
    /// redeems the same code between lookup and marking, this call loses and
    /// its freshly minted token is dropped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode`, `CodeExpired`, `UserNotFound`, `TokenIssueFailed`,
    /// or `Internal` for store failures
    pub async fn redeem(&self, code: &str) -> Result<ExchangeResponse, OAuthError> {
        let session = self
            .sessions
            .find_unused_by_code(code)
            .await
            .map_err(|e| OAuthError::Internal(e.to_string()))?
            .ok_or(OAuthError::InvalidCode)?;

        let now = Utc::now();
        if session.is_expired_at(now) {
            return Err(OAuthError::CodeExpired);
        }

        let user = self
            .users
            .get_user(&session.user_id)
            .await
            .map_err(|e| OAuthError::Internal(e.to_string()))?
            .ok_or(OAuthError::UserNotFound)?;

        let roles = self
            .users
            .get_user_roles(&user.id)
            .await
            .map_err(|e| OAuthError::Internal(e.to_string()))?;

        let token = self
            .auth
            .generate_token(&user)
            .map_err(|e| OAuthError::TokenIssueFailed(e.to_string()))?;

        let marked = self
            .sessions
            .mark_used(&session.code, now)
            .await
            .map_err(|e| OAuthError::Internal(e.to_string()))?;
        if !marked {
            warn!(user.id = %user.id, "Exchange code redeemed concurrently, discarding token");
            return Err(OAuthError::InvalidCode);
        }

        AppLogger::log_auth_event(&user.id, "code_exchange", true, None);
        Ok(ExchangeResponse {
            success: true,
            user: UserSummary::new(&user, roles),
            token,
        })
    }
}
