// ABOUTME: System-wide constants for the SSO bridge
// ABOUTME: Groups OAuth handshake, provider endpoint, and session lifetime values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Constants Module
//!
//! Hardcoded values shared by the bridge. Anything an operator may tune
//! lives in the server configuration instead and only defaults to these.

pub mod oauth;
pub mod provider;

/// Service identifiers used in logs and JWT audience claims
pub mod service {
    /// Service name reported by the CLI and logs
    pub const SERVICE_NAME: &str = "mattermost-sso-bridge";

    /// Audience claim stamped into issued JWTs
    pub const JWT_AUDIENCE: &str = "mattermost-sso-bridge";

    /// Version string reported when `VERSION` is not configured
    pub const UNKNOWN_VERSION: &str = "unknown";
}

/// Defaults for values that may be overridden from the environment
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8081;

    /// Default bind address
    pub const HOST: &str = "127.0.0.1";

    /// Default database URL
    pub const DATABASE_URL: &str = "sqlite:./data/bridge.db";

    /// Default JWT lifetime in hours
    pub const JWT_EXPIRY_HOURS: i64 = 24;

    /// Longest JWT lifetime accepted from configuration (one year)
    pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

    /// Longest exchange code lifetime accepted from configuration
    pub const MAX_EXCHANGE_CODE_TTL_SECS: i64 = 3600;

    /// Default scope requested from the provider
    pub const OAUTH_SCOPE: &str = "read";

    /// Role code assigned to newly provisioned users
    pub const DEFAULT_ROLE_CODE: &str = "member";

    /// Request timeout applied by the HTTP layer
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}
