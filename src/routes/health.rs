// ABOUTME: Health and version endpoints for monitoring
// ABOUTME: Unauthenticated, no storage access
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use axum::{routing::get, Json, Router};
use bridge_core::constants::service::UNKNOWN_VERSION;
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create `/health` and `/version`
    pub fn routes(version: Option<String>) -> Router {
        let version = version.unwrap_or_else(|| UNKNOWN_VERSION.to_owned());

        Router::new()
            .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
            .route(
                "/version",
                get(move || async move { Json::<Value>(json!({ "version": version })) }),
            )
    }
}
