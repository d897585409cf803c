// ABOUTME: Structured error types for database operations
// ABOUTME: Classifies sqlx failures into not-found, conflict, connection, and query errors
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use thiserror::Error;

/// Errors raised by the record store
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Entity lookup returned no row
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// Identifier used for the lookup
        id: String,
    },

    /// A uniqueness constraint rejected the write
    #[error("{entity} conflict: {reason}")]
    Conflict {
        /// Kind of entity that was written
        entity: &'static str,
        /// Constraint violation reported by the backend
        reason: String,
    },

    /// Connection could not be established or the pool is exhausted
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Schema migration failed
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// A stored value could not be decoded into the domain type
    #[error("Invalid data in field '{field}': {reason}")]
    InvalidData {
        /// Column that held the value
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Any other query failure
    #[error("Database query error: {context}")]
    QueryError {
        /// Backend error message
        context: String,
    },
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::NotFound {
                entity: "record",
                id: String::new(),
            },
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => Self::Conflict {
                entity: "record",
                reason: db_error.message().to_owned(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionError(error.to_string())
            }
            _ => Self::QueryError {
                context: error.to_string(),
            },
        }
    }
}
