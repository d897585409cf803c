// ABOUTME: HTTP middleware for authenticating requests with local session tokens
// ABOUTME: Validated claims are attached to request extensions for handlers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Bearer token authentication
pub mod auth;

pub use auth::require_auth;
