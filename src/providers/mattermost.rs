// ABOUTME: Mattermost identity provider built on the generic OAuth2 client
// ABOUTME: Exchanges codes at /oauth/access_token and reads /api/v4/users/me
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{IdentityProvider, ProviderError, ProviderProfile};
use crate::config::environment::MattermostConfig;
use crate::oauth2_client::{OAuth2Client, OAuth2Config};
use crate::utils::http_client::api_client;
use async_trait::async_trait;
use bridge_core::constants::provider::{
    ACCESS_TOKEN_PATH, AUTHORIZE_PATH, MATTERMOST, USERS_ME_PATH,
};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Mattermost OAuth2 identity provider
pub struct MattermostProvider {
    oauth: OAuth2Client,
    api: reqwest::Client,
    profile_url: String,
}

impl MattermostProvider {
    /// Build a provider from the Mattermost section of the server configuration
    #[must_use]
    pub fn new(config: &MattermostConfig) -> Self {
        let base = config.server_url.trim_end_matches('/');
        let oauth = OAuth2Client::new(OAuth2Config {
            provider: MATTERMOST.to_owned(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: format!("{base}{AUTHORIZE_PATH}"),
            token_url: format!("{base}{ACCESS_TOKEN_PATH}"),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
        });

        Self {
            oauth,
            api: api_client(),
            profile_url: format!("{base}{USERS_ME_PATH}"),
        }
    }
}

#[async_trait]
impl IdentityProvider for MattermostProvider {
    fn name(&self) -> &'static str {
        MATTERMOST
    }

    fn authorization_url(&self, state: &str) -> Result<String, ProviderError> {
        self.oauth.get_authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        let token = self.oauth.exchange_code(code).await?;
        debug!(
            token_type = %token.token_type,
            expires_in = ?token.expires_in,
            "Mattermost token issued"
        );
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let response = self
            .api
            .get(&self.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: MATTERMOST.to_owned(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Mattermost profile request rejected");
            return Err(ProviderError::ApiError {
                provider: MATTERMOST.to_owned(),
                status_code: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<ProviderProfile>()
            .await
            .map_err(|e| ProviderError::InvalidData {
                provider: MATTERMOST.to_owned(),
                field: "user profile".to_owned(),
                reason: e.to_string(),
            })
    }
}
