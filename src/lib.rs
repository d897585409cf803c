// ABOUTME: Main library entry point for the Mattermost SSO bridge
// ABOUTME: Exposes configuration, storage, OAuth flow, and HTTP routing modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Mattermost SSO Bridge
//!
//! Lets users of a web application sign in with their Mattermost account
//! without the browser ever seeing a Mattermost access token.
//!
//! ## Flow
//!
//! 1. `GET /auth/login` sets a CSRF state cookie and redirects to Mattermost
//! 2. `GET /auth/callback` verifies the state, exchanges the code, fetches the
//!    profile, reconciles the local user, and redirects the browser to the
//!    frontend with a short-lived single-use exchange code
//! 3. `POST /auth/exchange` trades that code for a local JWT and the user profile
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mattermost_sso_bridge::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Local JWT issuance and validation
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// SQLite storage and repository traits
pub mod database;

/// Structured logging setup
pub mod logging;

/// Request authentication middleware
pub mod middleware;

/// Login/callback flow, identity reconciliation, and code exchange
pub mod oauth;

/// Generic OAuth 2.0 authorization-code client
pub mod oauth2_client;

/// Identity provider seam and the Mattermost provider
pub mod providers;

/// HTTP route handlers
pub mod routes;

/// CSRF state tokens and secure cookies
pub mod security;

/// Shared resources, router, and serve loop
pub mod server;

/// HTTP client helpers
pub mod utils;

pub use bridge_core::{constants, errors, models};
