// ABOUTME: Shared server resources, router assembly, and the HTTP serve loop
// ABOUTME: Wires storage, token issuance, and the OAuth flow into axum routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::oauth::{CodeExchanger, FlowSettings, IdentityReconciler, OAuthFlowManager};
use crate::providers::IdentityProvider;
use crate::routes::{AuthRoutes, HealthRoutes, HelloRoutes};
use anyhow::{Context, Result};
use axum::Router;
use bridge_core::constants::defaults::REQUEST_TIMEOUT_SECS;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Long-lived state shared by every request
pub struct ServerResources {
    /// Storage handle behind the flow manager and code exchanger
    ///
    /// Request handling goes through those two; this field is kept for
    /// inspection of stored users and sessions, which the integration
    /// tests rely on.
    pub database: Arc<Database>,
    /// Local token issuer and validator
    pub auth_manager: Arc<AuthManager>,
    /// Login and callback pipeline
    pub flow_manager: Arc<OAuthFlowManager>,
    /// Exchange code redemption
    pub code_exchanger: Arc<CodeExchanger>,
    /// Version reported by `/version`
    pub version: Option<String>,
}

impl ServerResources {
    /// Build resources from storage, an identity provider, and configuration
    #[must_use]
    pub fn new(
        database: Database,
        provider: Arc<dyn IdentityProvider>,
        config: &ServerConfig,
    ) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(AuthManager::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.jwt_expiry_hours,
        ));

        let reconciler =
            IdentityReconciler::new(database.clone(), config.auth.default_role_codes.clone());
        let flow_manager = Arc::new(OAuthFlowManager::new(
            provider,
            reconciler,
            database.clone(),
            FlowSettings {
                app_url: config.app_url.clone(),
                cookie_path: config.auth.cookie_path.clone(),
                exchange_code_ttl_secs: config.auth.exchange_code_ttl_secs,
            },
        ));
        let code_exchanger = Arc::new(CodeExchanger::new(
            database.clone(),
            database.clone(),
            auth_manager.clone(),
        ));

        Self {
            database,
            auth_manager,
            flow_manager,
            code_exchanger,
            version: config.version.clone(),
        }
    }
}

/// Assemble the full application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(HelloRoutes::routes(resources.clone()))
        .merge(HealthRoutes::routes(resources.version.clone()))
        .layer(TimeoutLayer::new(StdDuration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(config: &ServerConfig, resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.http_port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("SSO bridge listening on http://{}", addr);

    axum::serve(listener, router(resources))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Graceful shutdown initiated");
}
