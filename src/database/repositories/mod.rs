// ABOUTME: Repository traits describing what the OAuth flow needs from storage
// ABOUTME: Implemented by the SQLite Database and by test doubles
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use async_trait::async_trait;
use bridge_core::errors::DatabaseError;
use bridge_core::models::{ExchangeSession, LocalUser, ProfileUpdate, Role, SessionIssue};
use chrono::{DateTime, Utc};

/// Local users and their roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact-match lookup by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<LocalUser>, DatabaseError>;

    /// Lookup by record id
    async fn get_user(&self, id: &str) -> Result<Option<LocalUser>, DatabaseError>;

    /// Insert a user together with its role links
    ///
    /// A duplicate email or id yields [`DatabaseError::Conflict`].
    async fn create_user(&self, user: &LocalUser, role_ids: &[String])
        -> Result<(), DatabaseError>;

    /// Overwrite the provider-owned profile fields of a user
    async fn update_profile(&self, id: &str, update: &ProfileUpdate)
        -> Result<(), DatabaseError>;

    /// Roles linked to a user
    async fn get_user_roles(&self, user_id: &str) -> Result<Vec<Role>, DatabaseError>;

    /// Lookup a role by its stable code
    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>, DatabaseError>;

    /// Create a role or rename an existing one with the same code
    async fn upsert_role(&self, code: &str, name: &str) -> Result<Role, DatabaseError>;
}

/// Exchange sessions keyed by code and by state
#[async_trait]
pub trait ExchangeSessionRepository: Send + Sync {
    /// Store `session` unless one already exists for its state
    ///
    /// Concurrent calls for the same state all observe the same stored session.
    async fn insert_if_absent(
        &self,
        session: &ExchangeSession,
    ) -> Result<SessionIssue, DatabaseError>;

    /// Session for `code` that has not been redeemed yet (expired ones included)
    async fn find_unused_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ExchangeSession>, DatabaseError>;

    /// Flip `used` to true if the session is unused and unexpired at `now`
    ///
    /// Returns whether this call performed the transition.
    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> Result<bool, DatabaseError>;
}
