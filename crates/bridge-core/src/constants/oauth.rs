// ABOUTME: OAuth handshake constants for the CSRF state cookie and exchange codes
// ABOUTME: Fixes cookie naming, lifetimes, and random token sizing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Name of the cookie carrying the CSRF state between login and callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the state cookie in seconds
pub const STATE_COOKIE_MAX_AGE_SECS: i64 = 600;

/// Path the state cookie is scoped to
pub const STATE_COOKIE_PATH: &str = "/auth";

/// Lifetime of an exchange code in seconds
pub const EXCHANGE_CODE_TTL_SECS: i64 = 120;

/// Random bytes behind every state value and exchange code
pub const TOKEN_BYTES: usize = 32;

/// Path on the frontend that receives the exchange code
pub const FRONTEND_CALLBACK_PATH: &str = "/oauth/callback";
