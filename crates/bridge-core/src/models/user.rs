// ABOUTME: Local user and role models touched by identity reconciliation
// ABOUTME: Provides the typed user summary returned on the exchange wire contract
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account status of a local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account may sign in
    #[default]
    Active,
    /// Account disabled by an administrator
    Inactive,
}

impl UserStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse the storage representation, `None` for unknown values
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role assignable to local users, looked up by `code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Record id
    pub id: String,
    /// Display name
    pub name: String,
    /// Stable lookup code (e.g. `member`)
    pub code: String,
}

/// Local user record as seen by the bridge
///
/// Users provisioned from the identity provider have no password; the
/// `auth_provider` column marks them as external-auth-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    /// Record id (the provider's user id for provisioned users)
    pub id: String,
    /// Unique email address
    pub email: String,
    /// Full display name
    pub name: String,
    /// Login handle
    pub username: String,
    /// Avatar URL
    pub avatar: String,
    /// Account status
    pub status: UserStatus,
    /// Whether the email is verified
    pub verified: bool,
    /// Identity provider that owns the credentials
    pub auth_provider: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Profile fields refreshed on every provider login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Full display name
    pub name: String,
    /// Login handle
    pub username: String,
    /// Avatar URL
    pub avatar: String,
    /// Update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Normalized user payload returned to the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Record id
    pub id: String,
    /// Email address
    pub email: String,
    /// Full display name
    pub name: String,
    /// Login handle
    pub username: String,
    /// Avatar URL
    pub avatar: String,
    /// Expanded roles
    pub roles: Vec<Role>,
}

impl UserSummary {
    /// Build a summary from a user and its expanded roles
    #[must_use]
    pub fn new(user: &LocalUser, roles: Vec<Role>) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            avatar: user.avatar.clone(),
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_round_trip_through_storage() {
        assert_eq!(UserStatus::parse("active"), Some(UserStatus::Active));
        assert_eq!(UserStatus::parse("inactive"), Some(UserStatus::Inactive));
        assert_eq!(UserStatus::parse("banned"), None);
        assert_eq!(UserStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_user_summary_wire_shape() {
        let now = Utc::now();
        let user = LocalUser {
            id: "mm-1".to_owned(),
            email: "a@x.com".to_owned(),
            name: "Ada Lovelace".to_owned(),
            username: "ada".to_owned(),
            avatar: "https://chat.example.com/avatar.png".to_owned(),
            status: UserStatus::Active,
            verified: true,
            auth_provider: "mattermost".to_owned(),
            created_at: now,
            updated_at: now,
        };
        let roles = vec![Role {
            id: "r1".to_owned(),
            name: "Member".to_owned(),
            code: "member".to_owned(),
        }];

        let json = serde_json::to_value(UserSummary::new(&user, roles)).unwrap_or_default();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "mm-1",
                "email": "a@x.com",
                "name": "Ada Lovelace",
                "username": "ada",
                "avatar": "https://chat.example.com/avatar.png",
                "roles": [{"id": "r1", "name": "Member", "code": "member"}]
            })
        );
    }
}
