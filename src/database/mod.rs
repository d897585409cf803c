// ABOUTME: SQLite storage for local users, roles, and exchange sessions
// ABOUTME: Owns the connection pool and idempotent schema setup
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Database Management
//!
//! A single [`Database`] handle backs both repository traits. The two
//! concurrency-sensitive operations (one session per state, single
//! redemption) are closed inside SQL statements rather than in process.

mod exchange_sessions;
/// Repository traits consumed by the OAuth flow
pub mod repositories;
mod users;

pub use repositories::{ExchangeSessionRepository, UserRepository};

use crate::config::DatabaseUrl;
use bridge_core::errors::DatabaseError;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::info;

/// Database manager for users, roles, and exchange sessions
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail
    pub async fn new(url: &DatabaseUrl) -> Result<Self, DatabaseError> {
        let pool = match url {
            // Every connection to :memory: is a separate database
            DatabaseUrl::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(&url.to_connection_string())
                .await?,
            DatabaseUrl::SQLite { path } => {
                ensure_parent_dir(path)?;
                SqlitePoolOptions::new()
                    .connect(&format!("{}?mode=rwc", url.to_connection_string()))
                    .await?
            }
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema migrations; safe to repeat
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        self.migrate_users()
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        self.migrate_exchange_sessions()
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), DatabaseError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| DatabaseError::ConnectionError(format!("{}: {e}", parent.display()))),
        _ => Ok(()),
    }
}
