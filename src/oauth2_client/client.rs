// ABOUTME: OAuth2 authorization-code client for the upstream identity provider
// ABOUTME: Builds consent URLs and performs the form-encoded token exchange
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::providers::ProviderError;
use crate::utils::http_client::oauth_client;
use serde::Deserialize;
use url::Url;

/// OAuth 2.0 client configuration
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// Provider identifier used in errors and logs
    pub provider: String,
    /// OAuth client ID from provider
    pub client_id: String,
    /// OAuth client secret from provider
    pub client_secret: String,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Redirect URI for OAuth callbacks
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

/// Access token returned by the token endpoint
///
/// Never serialized; it does not leave the process.
#[derive(Debug, Clone)]
pub struct OAuth2Token {
    /// The access token string
    pub access_token: String,
    /// Token type (usually "bearer")
    pub token_type: String,
    /// Lifetime in seconds, if reported
    pub expires_in: Option<u64>,
}

/// OAuth 2.0 client for the authorization-code grant
pub struct OAuth2Client {
    config: OAuth2Config,
    client: reqwest::Client,
}

impl OAuth2Client {
    /// Create a new `OAuth2` client with the given configuration
    #[must_use]
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            config,
            client: oauth_client(),
        }
    }

    /// Get authorization URL
    ///
    /// # Errors
    ///
    /// Returns an error if the configured authorization URL is malformed
    pub fn get_authorization_url(&self, state: &str) -> Result<String, ProviderError> {
        let mut url =
            Url::parse(&self.config.auth_url).map_err(|e| ProviderError::ConfigurationError {
                provider: self.config.provider.clone(),
                details: format!("invalid auth URL: {e}"),
            })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);

        Ok(url.to_string())
    }

    /// Exchange authorization code for an access token
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the provider answers with a
    /// non-success status, the body is not a token response, or the access
    /// token is empty
    pub async fn exchange_code(&self, code: &str) -> Result<OAuth2Token, ProviderError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: self.config.provider.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                provider: self.config.provider.clone(),
                status_code: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidData {
                    provider: self.config.provider.clone(),
                    field: "token response".to_owned(),
                    reason: e.to_string(),
                })?;

        if token.access_token.is_empty() {
            return Err(ProviderError::AuthenticationFailed {
                provider: self.config.provider.clone(),
                reason: "token response carried an empty access token".to_owned(),
            });
        }

        Ok(OAuth2Token {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        })
    }
}

/// OAuth 2.0 token response from provider
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: String,
    expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuth2Config {
        OAuth2Config {
            provider: "mattermost".to_owned(),
            client_id: "client-id".to_owned(),
            client_secret: "secret".to_owned(),
            auth_url: "https://chat.example.com/oauth/authorize".to_owned(),
            token_url: "https://chat.example.com/oauth/access_token".to_owned(),
            redirect_uri: "https://api.example.com/auth/callback".to_owned(),
            scopes: vec!["read".to_owned()],
        }
    }

    #[test]
    fn test_authorization_url_carries_all_parameters() {
        let client = OAuth2Client::new(config());
        let url = Url::parse(&client.get_authorization_url("st4te").unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/oauth/authorize");
        assert!(pairs.contains(&("client_id".to_owned(), "client-id".to_owned())));
        assert!(pairs.contains(&(
            "redirect_uri".to_owned(),
            "https://api.example.com/auth/callback".to_owned()
        )));
        assert!(pairs.contains(&("response_type".to_owned(), "code".to_owned())));
        assert!(pairs.contains(&("scope".to_owned(), "read".to_owned())));
        assert!(pairs.contains(&("state".to_owned(), "st4te".to_owned())));
    }

    #[test]
    fn test_malformed_auth_url_is_configuration_error() {
        let mut cfg = config();
        cfg.auth_url = "not a url".to_owned();
        let client = OAuth2Client::new(cfg);

        assert!(matches!(
            client.get_authorization_url("s"),
            Err(ProviderError::ConfigurationError { .. })
        ));
    }
}
