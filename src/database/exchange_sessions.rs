// ABOUTME: Exchange session storage with insert-if-absent issuance and conditional redemption
// ABOUTME: Implements ExchangeSessionRepository on the SQLite database
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{Database, ExchangeSessionRepository};
use async_trait::async_trait;
use bridge_core::errors::DatabaseError;
use bridge_core::models::{ExchangeSession, SessionIssue};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const SESSION_COLUMNS: &str = "code, state, user_id, used, expires_at, created_at";

impl Database {
    /// Create the `exchange_sessions` table
    ///
    /// Timestamps are epoch milliseconds so expiry checks compare integers.
    /// `user_id` carries no foreign key: sessions are never deleted, and a
    /// session whose user was removed must still be readable.
    pub(super) async fn migrate_exchange_sessions(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS exchange_sessions (
                code TEXT PRIMARY KEY,
                state TEXT UNIQUE NOT NULL,
                user_id TEXT NOT NULL,
                used BOOLEAN NOT NULL DEFAULT 0,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Session issued for `state`, used or not
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed
    pub async fn get_session_by_state(
        &self,
        state: &str,
    ) -> Result<Option<ExchangeSession>, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM exchange_sessions WHERE state = ?"
        ))
        .bind(state)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_session).transpose()
    }
}

fn millis_to_datetime(field: &'static str, millis: i64) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| DatabaseError::InvalidData {
        field,
        reason: format!("timestamp {millis} out of range"),
    })
}

fn row_to_session(row: &SqliteRow) -> Result<ExchangeSession, DatabaseError> {
    Ok(ExchangeSession {
        code: row.try_get("code")?,
        state: row.try_get("state")?,
        user_id: row.try_get("user_id")?,
        used: row.try_get("used")?,
        expires_at: millis_to_datetime("expires_at", row.try_get("expires_at")?)?,
        created_at: millis_to_datetime("created_at", row.try_get("created_at")?)?,
    })
}

#[async_trait]
impl ExchangeSessionRepository for Database {
    async fn insert_if_absent(
        &self,
        session: &ExchangeSession,
    ) -> Result<SessionIssue, DatabaseError> {
        let result = sqlx::query(&format!(
            "INSERT INTO exchange_sessions ({SESSION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(state) DO NOTHING"
        ))
        .bind(&session.code)
        .bind(&session.state)
        .bind(&session.user_id)
        .bind(session.used)
        .bind(session.expires_at.timestamp_millis())
        .bind(session.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        let stored = self
            .get_session_by_state(&session.state)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "exchange session",
                id: session.state.clone(),
            })?;

        if result.rows_affected() == 1 {
            Ok(SessionIssue::Created(stored))
        } else {
            Ok(SessionIssue::Existing(stored))
        }
    }

    async fn find_unused_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ExchangeSession>, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM exchange_sessions WHERE code = ? AND used = 0"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_session).transpose()
    }

    async fn mark_used(&self, code: &str, now: DateTime<Utc>) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE exchange_sessions SET used = 1 WHERE code = ? AND used = 0 AND expires_at > ?",
        )
        .bind(code)
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseUrl;
    use crate::database::UserRepository;
    use bridge_core::models::{LocalUser, UserStatus};
    use chrono::Duration;

    async fn db_with_user() -> Database {
        let db = Database::new(&DatabaseUrl::Memory).await.unwrap();
        let now = Utc::now();
        db.create_user(
            &LocalUser {
                id: "u1".to_owned(),
                email: "a@x.com".to_owned(),
                name: String::new(),
                username: "ada".to_owned(),
                avatar: String::new(),
                status: UserStatus::Active,
                verified: true,
                auth_provider: "mattermost".to_owned(),
                created_at: now,
                updated_at: now,
            },
            &[],
        )
        .await
        .unwrap();
        db
    }

    fn session(code: &str, state: &str, now: DateTime<Utc>) -> ExchangeSession {
        ExchangeSession::new(
            code.to_owned(),
            state.to_owned(),
            "u1".to_owned(),
            now,
            Duration::minutes(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_if_absent_returns_existing_for_same_state() {
        let db = db_with_user().await;
        let now = Utc::now();

        let first = db.insert_if_absent(&session("c1", "s1", now)).await.unwrap();
        let second = db.insert_if_absent(&session("c2", "s1", now)).await.unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(second.into_session().code, "c1");
        assert!(db.find_unused_by_code("c2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_used_transitions_once() {
        let db = db_with_user().await;
        let now = Utc::now();
        db.insert_if_absent(&session("c1", "s1", now)).await.unwrap();

        assert!(db.find_unused_by_code("c1").await.unwrap().is_some());
        assert!(db.mark_used("c1", now).await.unwrap());
        assert!(!db.mark_used("c1", now).await.unwrap());
        assert!(db.find_unused_by_code("c1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mark_used_refuses_expired_session() {
        let db = db_with_user().await;
        let created = Utc::now() - Duration::minutes(10);
        db.insert_if_absent(&session("c1", "s1", created)).await.unwrap();

        assert!(!db.mark_used("c1", Utc::now()).await.unwrap());
        let stored = db.find_unused_by_code("c1").await.unwrap().unwrap();
        assert!(!stored.used);
        assert!(stored.is_expired_at(Utc::now()));
    }

    #[tokio::test]
    async fn test_timestamps_round_trip_at_millisecond_precision() {
        let db = db_with_user().await;
        let now = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap();
        let stored = db
            .insert_if_absent(&session("c1", "s1", now))
            .await
            .unwrap()
            .into_session();

        assert_eq!(stored.created_at, now);
        assert_eq!(stored.expires_at, now + Duration::minutes(2));
    }
}
