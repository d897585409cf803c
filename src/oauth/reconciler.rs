// ABOUTME: Maps a provider profile onto a local user, creating or refreshing it
// ABOUTME: Email is the join key; provider-created users are external-auth-only
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::database::UserRepository;
use crate::providers::ProviderProfile;
use bridge_core::errors::DatabaseError;
use bridge_core::models::{LocalUser, ProfileUpdate, Role, UserStatus, UserSummary};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Reconciliation failures
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The provider profile has no email to match on
    #[error("provider profile has no email address")]
    MissingEmail,

    /// A configured default role code does not exist
    #[error("default role '{0}' does not exist")]
    MissingRole(String),

    /// Creation hit a uniqueness conflict but no user with the email exists
    #[error("user creation conflicted but no user with email {email} exists")]
    Conflict {
        /// Email that conflicted
        email: String,
    },

    /// Store failure
    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Finds or provisions the local user behind a provider login
pub struct IdentityReconciler {
    users: Arc<dyn UserRepository>,
    default_role_codes: Vec<String>,
}

impl IdentityReconciler {
    /// Create a reconciler granting `default_role_codes` to new users
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, default_role_codes: Vec<String>) -> Self {
        Self {
            users,
            default_role_codes,
        }
    }

    /// Find the user by exact email and refresh its profile fields, or create it
    ///
    /// Status and roles of an existing user are never touched. When two first
    /// logins race on the same email, the loser re-reads and refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile has no email, a default role is
    /// missing, or the store fails
    pub async fn reconcile(
        &self,
        profile: &ProviderProfile,
        provider: &str,
    ) -> Result<UserSummary, ReconcileError> {
        if profile.email.is_empty() {
            return Err(ReconcileError::MissingEmail);
        }

        if let Some(existing) = self.users.get_user_by_email(&profile.email).await? {
            return self.refresh(existing, profile).await;
        }

        let role_ids: Vec<String> = self
            .resolve_default_roles()
            .await?
            .into_iter()
            .map(|role| role.id)
            .collect();

        let now = Utc::now();
        let user = LocalUser {
            id: profile.id.clone(),
            email: profile.email.clone(),
            name: profile.full_name(),
            username: profile.username.clone(),
            avatar: profile.avatar_url.clone(),
            status: UserStatus::Active,
            verified: true,
            auth_provider: provider.to_owned(),
            created_at: now,
            updated_at: now,
        };

        match self.users.create_user(&user, &role_ids).await {
            Ok(()) => {
                info!(user.id = %user.id, "Provisioned local user from provider profile");
                let roles = self.users.get_user_roles(&user.id).await?;
                Ok(UserSummary::new(&user, roles))
            }
            Err(DatabaseError::Conflict { .. }) => {
                debug!(email = %profile.email, "Concurrent first login, re-reading user");
                let existing = self
                    .users
                    .get_user_by_email(&profile.email)
                    .await?
                    .ok_or_else(|| ReconcileError::Conflict {
                        email: profile.email.clone(),
                    })?;
                self.refresh(existing, profile).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn refresh(
        &self,
        mut user: LocalUser,
        profile: &ProviderProfile,
    ) -> Result<UserSummary, ReconcileError> {
        let update = ProfileUpdate {
            name: profile.full_name(),
            username: profile.username.clone(),
            avatar: profile.avatar_url.clone(),
            updated_at: Utc::now(),
        };
        self.users.update_profile(&user.id, &update).await?;

        user.name = update.name;
        user.username = update.username;
        user.avatar = update.avatar;
        user.updated_at = update.updated_at;

        let roles = self.users.get_user_roles(&user.id).await?;
        debug!(user.id = %user.id, "Refreshed local user from provider profile");
        Ok(UserSummary::new(&user, roles))
    }

    async fn resolve_default_roles(&self) -> Result<Vec<Role>, ReconcileError> {
        let mut roles = Vec::with_capacity(self.default_role_codes.len());
        for code in &self.default_role_codes {
            let role = self
                .users
                .get_role_by_code(code)
                .await?
                .ok_or_else(|| ReconcileError::MissingRole(code.clone()))?;
            roles.push(role);
        }
        Ok(roles)
    }
}
