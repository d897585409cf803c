// ABOUTME: Local session tokens issued after a successful code exchange
// ABOUTME: HS256 JWT generation and validation for bridge-authenticated requests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Local Authentication
//!
//! The bridge never hands the provider's access token to the browser. After
//! a code exchange it mints its own JWT, signed with the configured secret,
//! and validates that token on protected routes.

use bridge_core::constants::service::JWT_AUDIENCE;
use bridge_core::errors::{AppError, AppResult};
use bridge_core::models::LocalUser;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    #[error("JWT token is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed `JWT`
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid(other.to_string()),
        }
    }
}

/// `JWT` claims for a local session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Local user id
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at (seconds)
    pub iat: i64,
    /// Expiration (seconds)
    pub exp: i64,
    /// Audience
    pub aud: String,
}

/// Issues and validates local session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager signing with `secret`
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
        }
    }

    /// Generate a token for `user`
    ///
    /// # Errors
    ///
    /// Returns an internal error if the expiry is out of range or JWT
    /// encoding fails
    pub fn generate_token(&self, user: &LocalUser) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.token_expiry_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::internal(format!(
                    "token lifetime of {}h is out of range",
                    self.token_expiry_hours
                ))
            })?;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            aud: JWT_AUDIENCE.to_owned(),
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal("JWT encoding failed").with_source(e))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, carries a bad
    /// signature or audience, or is not a `JWT` at all
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[JWT_AUDIENCE]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(token, &e))
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(token: &str, e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::unverified_expiry(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token audience mismatch".into(),
            },
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => JwtValidationError::TokenMalformed {
                details: e.to_string(),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Read `exp` without verifying anything, for error reporting only
    fn unverified_expiry(token: &str) -> Option<DateTime<Utc>> {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

        let payload = token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;
        DateTime::from_timestamp(claims.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::models::UserStatus;

    fn user() -> LocalUser {
        let now = Utc::now();
        LocalUser {
            id: "mm-1".to_owned(),
            email: "a@x.com".to_owned(),
            name: "Ada".to_owned(),
            username: "ada".to_owned(),
            avatar: String::new(),
            status: UserStatus::Active,
            verified: true,
            auth_provider: "mattermost".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let manager = AuthManager::new(b"test-secret", 24);
        let token = manager.generate_token(&user()).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "mm-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.aud, JWT_AUDIENCE);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_out_of_range_expiry_is_an_error() {
        let manager = AuthManager::new(b"test-secret", 10_000_000_000_000);
        assert!(manager.generate_token(&user()).is_err());

        let manager = AuthManager::new(b"test-secret", i64::MAX);
        assert!(manager.generate_token(&user()).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = AuthManager::new(b"secret-a", 24)
            .generate_token(&user())
            .unwrap();
        let result = AuthManager::new(b"secret-b", 24).validate_token(&token);

        assert!(matches!(result, Err(JwtValidationError::TokenInvalid { .. })));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = AuthManager::new(b"test-secret", 24);
        let now = Utc::now();
        let claims = Claims {
            sub: "mm-1".to_owned(),
            email: "a@x.com".to_owned(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
            aud: JWT_AUDIENCE.to_owned(),
        };
        let token = manager.encode_claims(&claims).unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
        assert_eq!(
            AppError::from(err).code,
            bridge_core::errors::ErrorCode::AuthExpired
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let manager = AuthManager::new(b"test-secret", 24);
        assert!(matches!(
            manager.validate_token("not-a-jwt"),
            Err(JwtValidationError::TokenMalformed { .. })
        ));
    }
}
