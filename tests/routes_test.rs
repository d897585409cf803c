// ABOUTME: HTTP tests for health, version, and the bearer-protected hello route
// ABOUTME: Verifies that tokens minted by the exchange flow unlock protected routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use common::TestApp;
use helpers::axum_test::AxumTestRequest;
use mattermost_sso_bridge::auth::AuthManager;
use mattermost_sso_bridge::models::{LocalUser, UserStatus};
use serde_json::Value;

fn local_user() -> LocalUser {
    let now = Utc::now();
    LocalUser {
        id: "mm-user-1".to_owned(),
        email: "alice@example.com".to_owned(),
        name: "Alice Liddell".to_owned(),
        username: "alice".to_owned(),
        avatar: String::new(),
        status: UserStatus::Active,
        verified: true,
        auth_provider: "mattermost".to_owned(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await.unwrap();
    let body: Value = AxumTestRequest::get("/health")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_version_reports_configured_version() {
    let app = TestApp::new().await.unwrap();
    let body: Value = AxumTestRequest::get("/version")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["version"], "1.2.3-test");
}

#[tokio::test]
async fn test_hello_requires_token() {
    let app = TestApp::new().await.unwrap();
    let response = AxumTestRequest::get("/hello").send(app.router()).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_hello_rejects_foreign_token() {
    let app = TestApp::new().await.unwrap();
    let foreign = AuthManager::new(b"some-other-secret", 24)
        .generate_token(&local_user())
        .unwrap();

    let response = AxumTestRequest::get("/hello")
        .bearer(&foreign)
        .send(app.router())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_hello_with_valid_token() {
    let app = TestApp::new().await.unwrap();
    let token = app
        .resources
        .auth_manager
        .generate_token(&local_user())
        .unwrap();

    let text = AxumTestRequest::get("/hello")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .text();
    assert_eq!(text, "Hello world!");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await.unwrap();
    let response = AxumTestRequest::get("/nope").send(app.router()).await;
    assert_eq!(response.status(), 404);
}
