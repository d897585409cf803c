// ABOUTME: Bearer JWT authentication middleware for protected routes
// ABOUTME: Rejects missing, malformed, expired, or foreign tokens with 401
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::server::ServerResources;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use bridge_core::errors::AppError;
use std::sync::Arc;

/// Validate `Authorization: Bearer <jwt>` and store the claims in request extensions
///
/// # Errors
///
/// Returns `AUTH_REQUIRED` without a bearer header, and `AUTH_INVALID` or
/// `AUTH_EXPIRED` when validation fails
pub async fn require_auth(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(AppError::auth_required)?;

    let claims = resources.auth_manager.validate_token(token)?;
    tracing::debug!(user.id = %claims.sub, "Request authenticated");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
