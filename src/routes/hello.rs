// ABOUTME: Protected greeting endpoint exercising local session tokens
// ABOUTME: Requires a valid bearer JWT issued by the code exchange
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::middleware::require_auth;
use crate::server::ServerResources;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

/// Protected demo routes
pub struct HelloRoutes;

impl HelloRoutes {
    /// Create `/hello`
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/hello", get(|| async { "Hello world!" }))
            .layer(middleware::from_fn_with_state(resources, require_auth))
    }
}
