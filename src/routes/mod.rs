// ABOUTME: Route module organization for the SSO bridge HTTP endpoints
// ABOUTME: Each domain module exposes a routes() constructor returning an axum Router
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Login, callback, and code exchange routes
pub mod auth;
/// Health check and version routes
pub mod health;
/// Token-protected greeting route
pub mod hello;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use hello::HelloRoutes;
