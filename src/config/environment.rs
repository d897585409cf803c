// ABOUTME: Environment-based server configuration for the SSO bridge
// ABOUTME: Parses provider credentials, frontend URL, token lifetimes, and storage location
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bridge_core::constants::{defaults, oauth};
use ring::rand::{SecureRandom, SystemRandom};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// File path of the database
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or a bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Mattermost OAuth application settings
#[derive(Clone)]
pub struct MattermostConfig {
    /// OAuth application id
    pub client_id: String,
    /// OAuth application secret
    pub client_secret: String,
    /// Base URL of the Mattermost server
    pub server_url: String,
    /// Callback URL registered with the OAuth application
    pub redirect_uri: String,
    /// Scopes requested at consent
    pub scopes: Vec<String>,
}

impl fmt::Debug for MattermostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MattermostConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Local session issuance settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for local JWTs
    pub jwt_secret: String,
    /// Lifetime of local JWTs in hours
    pub jwt_expiry_hours: i64,
    /// Lifetime of exchange codes in seconds
    pub exchange_code_ttl_secs: i64,
    /// Role codes granted to newly provisioned users
    pub default_role_codes: Vec<String>,
    /// Path the CSRF state cookie is scoped to
    pub cookie_path: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("exchange_code_ttl_secs", &self.exchange_code_ttl_secs)
            .field("default_role_codes", &self.default_role_codes)
            .field("cookie_path", &self.cookie_path)
            .finish()
    }
}

/// Server configuration, read once from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// Storage settings
    pub database: DatabaseConfig,
    /// Identity provider settings
    pub mattermost: MattermostConfig,
    /// Frontend base URL receiving the exchange code
    pub app_url: String,
    /// Local token settings
    pub auth: AuthConfig,
    /// Deployed version reported by `/version`
    pub version: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET not set; tokens are signed with an ephemeral secret");
                generate_jwt_secret()?
            }
        };

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            host: env_var_or("HOST", defaults::HOST),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", defaults::DATABASE_URL)),
            },
            mattermost: MattermostConfig {
                client_id: env_var_or("MATTERMOST_CLIENT_ID", ""),
                client_secret: env_var_or("MATTERMOST_CLIENT_SECRET", ""),
                server_url: env_var_or("MATTERMOST_SERVER_URL", ""),
                redirect_uri: env_var_or("MATTERMOST_REDIRECT_URI", ""),
                scopes: parse_list(&env_var_or("MATTERMOST_SCOPES", defaults::OAUTH_SCOPE)),
            },
            app_url: env_var_or("APP_URL", ""),
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours: env_var_or(
                    "JWT_EXPIRY_HOURS",
                    &defaults::JWT_EXPIRY_HOURS.to_string(),
                )
                .parse()
                .context("Invalid JWT_EXPIRY_HOURS value")?,
                exchange_code_ttl_secs: env_var_or(
                    "EXCHANGE_CODE_TTL_SECS",
                    &oauth::EXCHANGE_CODE_TTL_SECS.to_string(),
                )
                .parse()
                .context("Invalid EXCHANGE_CODE_TTL_SECS value")?,
                default_role_codes: parse_list(&env_var_or(
                    "DEFAULT_ROLE_CODES",
                    defaults::DEFAULT_ROLE_CODE,
                )),
                cookie_path: env_var_or("AUTH_COOKIE_PATH", oauth::STATE_COOKIE_PATH),
            },
            version: env::var("VERSION").ok().filter(|v| !v.is_empty()),
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or malformed setting
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("MATTERMOST_CLIENT_ID", &self.mattermost.client_id),
            ("MATTERMOST_CLIENT_SECRET", &self.mattermost.client_secret),
            ("MATTERMOST_SERVER_URL", &self.mattermost.server_url),
            ("MATTERMOST_REDIRECT_URI", &self.mattermost.redirect_uri),
            ("APP_URL", &self.app_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} is required"));
            }
        }

        for (name, value) in [
            ("MATTERMOST_SERVER_URL", &self.mattermost.server_url),
            ("MATTERMOST_REDIRECT_URI", &self.mattermost.redirect_uri),
            ("APP_URL", &self.app_url),
        ] {
            Url::parse(value).with_context(|| format!("{name} is not a valid URL"))?;
        }

        if !(1..=defaults::MAX_EXCHANGE_CODE_TTL_SECS).contains(&self.auth.exchange_code_ttl_secs) {
            return Err(anyhow::anyhow!(
                "EXCHANGE_CODE_TTL_SECS must be between 1 and {}",
                defaults::MAX_EXCHANGE_CODE_TTL_SECS
            ));
        }
        if !(1..=defaults::MAX_JWT_EXPIRY_HOURS).contains(&self.auth.jwt_expiry_hours) {
            return Err(anyhow::anyhow!(
                "JWT_EXPIRY_HOURS must be between 1 and {}",
                defaults::MAX_JWT_EXPIRY_HOURS
            ));
        }
        if self.auth.default_role_codes.is_empty() {
            return Err(anyhow::anyhow!("DEFAULT_ROLE_CODES must name at least one role"));
        }
        if !self.auth.cookie_path.starts_with('/') {
            return Err(anyhow::anyhow!("AUTH_COOKIE_PATH must start with '/'"));
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Mattermost SSO Bridge Configuration:\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - Mattermost: {}\n\
             - Redirect URI: {}\n\
             - Scopes: {}\n\
             - Frontend: {}\n\
             - Exchange code TTL: {}s\n\
             - JWT expiry: {}h\n\
             - Default roles: {}\n\
             - Version: {}",
            self.host,
            self.http_port,
            if self.database.url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.mattermost.server_url,
            self.mattermost.redirect_uri,
            self.mattermost.scopes.join(" "),
            self.app_url,
            self.auth.exchange_code_ttl_secs,
            self.auth.jwt_expiry_hours,
            self.auth.default_role_codes.join(","),
            self.version.as_deref().unwrap_or("unknown"),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a comma- or space-separated list
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// 64 random bytes, URL-safe base64
fn generate_jwt_secret() -> Result<String> {
    let rng = SystemRandom::new();
    let mut secret = [0u8; 64];
    rng.fill(&mut secret)
        .map_err(|_| anyhow::anyhow!("Failed to generate JWT secret"))?;
    Ok(URL_SAFE_NO_PAD.encode(secret))
}
