// ABOUTME: Mattermost endpoint paths and client timeouts
// ABOUTME: Paths are joined onto the configured Mattermost server URL
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Provider identifier stored on provisioned users
pub const MATTERMOST: &str = "mattermost";

/// Authorization endpoint
pub const AUTHORIZE_PATH: &str = "/oauth/authorize";

/// Token endpoint
pub const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Current-user profile endpoint
pub const USERS_ME_PATH: &str = "/api/v4/users/me";

/// Timeout for the profile fetch
pub const PROFILE_FETCH_TIMEOUT_SECS: u64 = 10;

/// Total timeout for token exchange requests
pub const TOKEN_EXCHANGE_TIMEOUT_SECS: u64 = 15;

/// Connect timeout for all provider requests
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
