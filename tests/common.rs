// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, test configuration, and a scripted identity provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `mattermost_sso_bridge`

use anyhow::Result;
use async_trait::async_trait;
use mattermost_sso_bridge::{
    config::{AuthConfig, DatabaseConfig, DatabaseUrl, MattermostConfig, ServerConfig},
    database::{Database, UserRepository},
    providers::{IdentityProvider, ProviderError, ProviderProfile},
    server::{self, ServerResources},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

pub const TEST_APP_URL: &str = "https://app.example.test";
pub const TEST_JWT_SECRET: &str = "integration-test-secret-with-enough-entropy";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup, seeded with the default `member` role
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new(&DatabaseUrl::Memory).await?;
    database.upsert_role("member", "Member").await?;
    Ok(database)
}

/// Configuration pointing at `mattermost_url` with test secrets
pub fn test_config(mattermost_url: &str) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        host: "127.0.0.1".to_owned(),
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        mattermost: MattermostConfig {
            client_id: "test-client".to_owned(),
            client_secret: "test-secret".to_owned(),
            server_url: mattermost_url.to_owned(),
            redirect_uri: "https://bridge.example.test/auth/callback".to_owned(),
            scopes: vec!["read".to_owned()],
        },
        app_url: TEST_APP_URL.to_owned(),
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            jwt_expiry_hours: 24,
            exchange_code_ttl_secs: 120,
            default_role_codes: vec!["member".to_owned()],
            cookie_path: "/auth".to_owned(),
        },
        version: Some("1.2.3-test".to_owned()),
    }
}

/// Profile returned by the scripted provider unless overridden
pub fn test_profile() -> ProviderProfile {
    ProviderProfile {
        id: "mm-user-1".to_owned(),
        email: "alice@example.com".to_owned(),
        username: "alice".to_owned(),
        first_name: "Alice".to_owned(),
        last_name: "Liddell".to_owned(),
        avatar_url: "https://mm.example.test/api/v4/users/mm-user-1/image".to_owned(),
        ..ProviderProfile::default()
    }
}

/// Identity provider answering from a fixed script, counting calls
pub struct ScriptedProvider {
    profile: ProviderProfile,
    fail_exchange: bool,
    fail_profile: bool,
    exchange_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(profile: ProviderProfile) -> Self {
        Self {
            profile,
            fail_exchange: false,
            fail_profile: false,
            exchange_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_exchange() -> Self {
        Self {
            fail_exchange: true,
            ..Self::new(test_profile())
        }
    }

    pub fn failing_profile() -> Self {
        Self {
            fail_profile: true,
            ..Self::new(test_profile())
        }
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "mattermost"
    }

    fn authorization_url(&self, state: &str) -> Result<String, ProviderError> {
        Ok(format!(
            "https://mm.example.test/oauth/authorize?client_id=test-client&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exchange {
            return Err(ProviderError::ApiError {
                provider: "mattermost".to_owned(),
                status_code: 400,
                message: "invalid_grant".to_owned(),
            });
        }
        Ok(format!("access-token-for-{code}"))
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<ProviderProfile, ProviderError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(ProviderError::ApiError {
                provider: "mattermost".to_owned(),
                status_code: 401,
                message: "token revoked".to_owned(),
            });
        }
        Ok(self.profile.clone())
    }
}

/// Test harness: resources, router factory, and the provider behind them
pub struct TestApp {
    pub resources: Arc<ServerResources>,
    pub provider: Arc<ScriptedProvider>,
}

impl TestApp {
    pub async fn with_provider(provider: ScriptedProvider) -> Result<Self> {
        Self::with_config(provider, test_config("https://mm.example.test")).await
    }

    pub async fn with_config(provider: ScriptedProvider, config: ServerConfig) -> Result<Self> {
        let database = create_test_database().await?;
        let provider = Arc::new(provider);
        let resources = Arc::new(ServerResources::new(database, provider.clone(), &config));
        Ok(Self {
            resources,
            provider,
        })
    }

    pub async fn new() -> Result<Self> {
        Self::with_provider(ScriptedProvider::new(test_profile())).await
    }

    pub fn router(&self) -> axum::Router {
        server::router(self.resources.clone())
    }
}
