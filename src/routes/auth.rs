// ABOUTME: Provider login, callback, and exchange-code redemption endpoints
// ABOUTME: Thin axum handlers delegating to the OAuth flow manager and code exchanger
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Authentication routes
//!
//! - `GET /auth/login`: 302 to the provider with a fresh CSRF state cookie
//! - `GET /auth/callback`: 302 to the frontend with an exchange code
//! - `POST /auth/exchange`: exchange code for a local token and profile

use crate::oauth::{CallbackParams, ExchangeRequest, OAuthError};
use crate::security::cookies::{get_cookie_value, set_oauth_state_cookie};
use crate::server::ServerResources;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bridge_core::constants::oauth::OAUTH_STATE_COOKIE;
use std::sync::Arc;
use tracing::warn;

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/auth/login", get(Self::handle_login))
            .route("/auth/callback", get(Self::handle_callback))
            .route("/auth/exchange", post(Self::handle_exchange))
            .with_state(resources)
    }

    async fn handle_login(State(resources): State<Arc<ServerResources>>) -> Response {
        let flow = &resources.flow_manager;
        match flow.begin_login() {
            Ok(login) => {
                let mut headers = HeaderMap::new();
                set_oauth_state_cookie(&mut headers, &login.state, flow.cookie_path());
                found(headers, &login.authorization_url)
            }
            Err(e) => e.into_response(),
        }
    }

    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        request_headers: HeaderMap,
        query: Result<Query<CallbackParams>, QueryRejection>,
    ) -> Response {
        // An unparseable query cannot carry a usable state
        let params = match query {
            Ok(Query(params)) => params,
            Err(e) => {
                warn!("Rejected callback query: {}", e.body_text());
                return OAuthError::InvalidState.into_response();
            }
        };
        let cookie_state = get_cookie_value(&request_headers, OAUTH_STATE_COOKIE);
        let mut headers = HeaderMap::new();

        match resources
            .flow_manager
            .handle_callback(cookie_state.as_deref(), &params, &mut headers)
            .await
        {
            Ok(redirect_url) => found(headers, &redirect_url),
            // Failures after reconciliation still carry the cookie removal
            Err(e) => (headers, e).into_response(),
        }
    }

    async fn handle_exchange(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<ExchangeRequest>, JsonRejection>,
    ) -> Result<Response, OAuthError> {
        let Json(request) = body.map_err(|e| OAuthError::InvalidRequest(e.body_text()))?;
        let response = resources.code_exchanger.redeem(&request.code).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

/// 302 Found to `location`, keeping any cookies already in `headers`
fn found(mut headers: HeaderMap, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(header::LOCATION, value);
            (StatusCode::FOUND, headers).into_response()
        }
        Err(e) => OAuthError::Internal(format!("invalid redirect location: {e}")).into_response(),
    }
}
