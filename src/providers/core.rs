// ABOUTME: Identity provider trait and the provider-neutral profile model
// ABOUTME: The login/callback controller depends only on this seam, never on a concrete provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Identity Provider Seam
//!
//! An [`IdentityProvider`] covers the three calls of an authorization-code
//! login: build the consent URL, redeem the code, read the user's profile.
//! Production wiring uses the Mattermost provider; tests substitute a fake.

use super::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;

/// Profile of the authenticated user as reported by the provider
///
/// Read-only. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderProfile {
    /// Provider user id
    pub id: String,
    /// Email address
    pub email: String,
    /// Login handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Avatar URL
    pub avatar_url: String,
    /// Preferred locale
    pub locale: String,
    /// Creation time
    pub create_at: i64,
    /// Last update time
    pub update_at: i64,
    /// Deactivation time, zero when active
    pub delete_at: i64,
    /// Opaque timezone document
    pub timezone: serde_json::Value,
}

impl ProviderProfile {
    /// Full name as "first last", trimmed
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Upstream identity provider used by the login and callback flow
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider identifier stored on provisioned users
    fn name(&self) -> &'static str;

    /// Consent URL carrying `state`
    ///
    /// # Errors
    ///
    /// Returns an error if the provider endpoints are misconfigured
    fn authorization_url(&self, state: &str) -> Result<String, ProviderError>;

    /// Redeem an authorization code for a provider access token
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an empty token
    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError>;

    /// Fetch the profile of the user owning `access_token`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-200 status, or an unparseable body
    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_is_trimmed() {
        let mut profile = ProviderProfile {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            ..ProviderProfile::default()
        };
        assert_eq!(profile.full_name(), "Ada Lovelace");

        profile.last_name = String::new();
        assert_eq!(profile.full_name(), "Ada");

        profile.first_name = String::new();
        assert_eq!(profile.full_name(), "");
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let profile: ProviderProfile = serde_json::from_str(
            r#"{
                "id": "u1",
                "email": "a@x.com",
                "username": "ada",
                "timezone": {"useAutomaticTimezone": "true"}
            }"#,
        )
        .unwrap();

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.avatar_url, "");
        assert_eq!(profile.delete_at, 0);
        assert!(profile.timezone.is_object());
    }
}
