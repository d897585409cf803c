// ABOUTME: Login redirect and callback pipeline for the provider authorization-code flow
// ABOUTME: Verifies CSRF state, reconciles the user, and issues an idempotent exchange session
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{IdentityReconciler, OAuthError};
use crate::database::ExchangeSessionRepository;
use crate::logging::AppLogger;
use crate::providers::{IdentityProvider, ProviderError};
use crate::security::cookies::clear_oauth_state_cookie;
use crate::security::generate_secure_token;
use bridge_core::constants::oauth::FRONTEND_CALLBACK_PATH;
use bridge_core::models::ExchangeSession;
use chrono::{Duration, Utc};
use http::HeaderMap;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Where to send the browser for consent, and the state bound to it
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    /// Provider consent URL
    pub authorization_url: String,
    /// CSRF state to place in the cookie
    pub state: String,
}

/// Query parameters of the provider callback
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code
    pub code: Option<String>,
    /// CSRF state echoed by the provider
    pub state: Option<String>,
}

/// Frontend and lifetime settings of the flow
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Frontend base URL
    pub app_url: String,
    /// Path the state cookie is scoped to
    pub cookie_path: String,
    /// Lifetime of exchange codes in seconds
    pub exchange_code_ttl_secs: i64,
}

/// Orchestrates login and callback against one identity provider
pub struct OAuthFlowManager {
    provider: Arc<dyn IdentityProvider>,
    reconciler: IdentityReconciler,
    sessions: Arc<dyn ExchangeSessionRepository>,
    settings: FlowSettings,
}

impl OAuthFlowManager {
    /// Create a flow manager
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        reconciler: IdentityReconciler,
        sessions: Arc<dyn ExchangeSessionRepository>,
        settings: FlowSettings,
    ) -> Self {
        Self {
            provider,
            reconciler,
            sessions,
            settings,
        }
    }

    /// Path the state cookie is scoped to
    #[must_use]
    pub fn cookie_path(&self) -> &str {
        &self.settings.cookie_path
    }

    /// Generate a fresh state and the consent URL carrying it
    ///
    /// Nothing is stored server-side; the state lives only in the cookie.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Internal`] if randomness or the provider URL fails
    pub fn begin_login(&self) -> Result<LoginRedirect, OAuthError> {
        let state = generate_secure_token().map_err(|e| OAuthError::Internal(e.to_string()))?;
        let authorization_url = self
            .provider
            .authorization_url(&state)
            .map_err(|e| OAuthError::Internal(e.to_string()))?;

        debug!(provider = self.provider.name(), "Redirecting to provider consent");
        Ok(LoginRedirect {
            authorization_url,
            state,
        })
    }

    /// Run the callback pipeline and return the frontend redirect URL
    ///
    /// Steps run strictly in order: state check, code exchange, profile
    /// fetch, reconciliation, state cookie removal (appended to
    /// `response_headers`), session issuance. A replayed callback for the
    /// same state yields the code issued the first time.
    ///
    /// # Errors
    ///
    /// Returns the [`OAuthError`] of the first step that fails
    pub async fn handle_callback(
        &self,
        cookie_state: Option<&str>,
        params: &CallbackParams,
        response_headers: &mut HeaderMap,
    ) -> Result<String, OAuthError> {
        let state = verify_state(cookie_state, params.state.as_deref())?;

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                OAuthError::TokenExchangeFailed(ProviderError::AuthenticationFailed {
                    provider: self.provider.name().to_owned(),
                    reason: "callback carried no authorization code".to_owned(),
                })
            })?;

        let access_token = self
            .provider
            .exchange_code(code)
            .await
            .map_err(OAuthError::TokenExchangeFailed)?;

        let profile = self
            .provider
            .fetch_profile(&access_token)
            .await
            .map_err(OAuthError::ProfileFetchFailed)?;

        let user = self
            .reconciler
            .reconcile(&profile, self.provider.name())
            .await
            .map_err(OAuthError::ReconciliationFailed)?;

        clear_oauth_state_cookie(response_headers, &self.settings.cookie_path);

        let exchange_code = self.issue_session(state, &user.id).await?;
        AppLogger::log_oauth_event(&user.id, self.provider.name(), "callback", true);

        Ok(frontend_redirect_url(&self.settings.app_url, &exchange_code))
    }

    async fn issue_session(&self, state: &str, user_id: &str) -> Result<String, OAuthError> {
        let code =
            generate_secure_token().map_err(|e| OAuthError::SessionIssueFailed(e.to_string()))?;
        let ttl = self.settings.exchange_code_ttl_secs;
        let session = Duration::try_seconds(ttl)
            .and_then(|lifetime| {
                ExchangeSession::new(
                    code,
                    state.to_owned(),
                    user_id.to_owned(),
                    Utc::now(),
                    lifetime,
                )
            })
            .ok_or_else(|| {
                OAuthError::SessionIssueFailed(format!("exchange code ttl {ttl}s is out of range"))
            })?;

        let issued = self
            .sessions
            .insert_if_absent(&session)
            .await
            .map_err(|e| OAuthError::SessionIssueFailed(e.to_string()))?;

        if !issued.is_created() {
            info!(user.id = %user_id, "Callback replayed, returning existing exchange code");
        }
        Ok(issued.into_session().code)
    }
}

/// Both values must be present, non-empty, and equal
fn verify_state<'a>(
    cookie_state: Option<&str>,
    query_state: Option<&'a str>,
) -> Result<&'a str, OAuthError> {
    match (cookie_state, query_state) {
        (Some(cookie), Some(query)) if !cookie.is_empty() && cookie == query => Ok(query),
        (None, _) => {
            AppLogger::log_security_event(
                "oauth_state_missing",
                "medium",
                "no state cookie on callback",
            );
            Err(OAuthError::InvalidState)
        }
        _ => {
            AppLogger::log_security_event(
                "oauth_state_mismatch",
                "high",
                "callback state differs from cookie",
            );
            Err(OAuthError::InvalidState)
        }
    }
}

/// `<app_url>/oauth/callback?code=<escaped code>`
#[must_use]
pub fn frontend_redirect_url(app_url: &str, code: &str) -> String {
    format!(
        "{}{}?code={}",
        app_url.trim_end_matches('/'),
        FRONTEND_CALLBACK_PATH,
        urlencoding::encode(code)
    )
}
