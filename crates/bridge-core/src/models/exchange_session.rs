// ABOUTME: Exchange session model linking a one-time code to a reconciled local user
// ABOUTME: Tracks single-use consumption and absolute expiry of exchange codes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One-time, short-lived code handed to the browser instead of a bearer token
///
/// `used` only ever moves from `false` to `true`, and at most one session
/// exists per `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeSession {
    /// Opaque exchange code
    pub code: String,
    /// CSRF state of the handshake that produced this session
    pub state: String,
    /// Local user id
    pub user_id: String,
    /// Whether the code has been redeemed
    pub used: bool,
    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ExchangeSession {
    /// Create a fresh, unused session expiring `ttl` after `now`
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    #[must_use]
    pub fn new(
        code: String,
        state: String,
        user_id: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            code,
            state,
            user_id,
            used: false,
            expires_at,
            created_at: now,
        })
    }

    /// Whether the session is past its expiry at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Outcome of idempotent session issuance for a given `state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIssue {
    /// No session existed for the state; this one was stored
    Created(ExchangeSession),
    /// A session already existed for the state and is returned unchanged
    Existing(ExchangeSession),
}

impl SessionIssue {
    /// The stored session, whichever way it was obtained
    #[must_use]
    pub fn into_session(self) -> ExchangeSession {
        match self {
            Self::Created(session) | Self::Existing(session) => session,
        }
    }

    /// Whether this call created the session
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
