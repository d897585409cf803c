// ABOUTME: HTTP client construction with timeout presets for provider calls
// ABOUTME: Every outbound request is bounded; there is no retry policy
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use bridge_core::constants::provider::{
    CONNECT_TIMEOUT_SECS, PROFILE_FETCH_TIMEOUT_SECS, TOKEN_EXCHANGE_TIMEOUT_SECS,
};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails (TLS backend init).
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for OAuth token exchanges
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(TOKEN_EXCHANGE_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS)
}

/// Client for provider API calls (profile fetch)
#[must_use]
pub fn api_client() -> Client {
    create_client_with_timeout(PROFILE_FETCH_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS)
}
