// ABOUTME: Structured error types for identity provider calls
// ABOUTME: Distinguishes transport failures, non-success API statuses, and bad payloads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use thiserror::Error;

/// Errors raised while talking to an identity provider
///
/// Provider calls are single attempts; none of these variants are retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("{provider} API error ({status_code}): {message}")]
    ApiError {
        /// Provider identifier
        provider: String,
        /// HTTP status returned by the provider
        status_code: u16,
        /// Response body or summary
        message: String,
    },

    /// The request never produced a response (DNS, connect, timeout)
    #[error("{provider} request failed: {source}")]
    Network {
        /// Provider identifier
        provider: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The provider rejected the authorization grant or returned no token
    #[error("{provider} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Provider identifier
        provider: String,
        /// Failure description
        reason: String,
    },

    /// The response body could not be interpreted
    #[error("{provider} returned invalid data for {field}: {reason}")]
    InvalidData {
        /// Provider identifier
        provider: String,
        /// Field or document that failed to parse
        field: String,
        /// Failure description
        reason: String,
    },

    /// Provider endpoints are misconfigured
    #[error("{provider} configuration error: {details}")]
    ConfigurationError {
        /// Provider identifier
        provider: String,
        /// Failure description
        details: String,
    },
}

impl ProviderError {
    /// HTTP status reported by the provider, when it answered at all
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
