// ABOUTME: User and role storage for identity reconciliation
// ABOUTME: Implements UserRepository on the SQLite database
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{Database, UserRepository};
use async_trait::async_trait;
use bridge_core::errors::DatabaseError;
use bridge_core::models::{LocalUser, ProfileUpdate, Role, UserStatus};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, email, name, username, avatar, status, verified, auth_provider, created_at, updated_at";

impl Database {
    /// Create users, roles, and `user_roles` tables
    pub(super) async fn migrate_users(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                username TEXT NOT NULL DEFAULT '',
                avatar TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
                verified BOOLEAN NOT NULL DEFAULT 0,
                auth_provider TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                code TEXT UNIQUE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_roles (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                role_id TEXT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
                PRIMARY KEY (user_id, role_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_user(row: &SqliteRow) -> Result<LocalUser, DatabaseError> {
    let status: String = row.try_get("status")?;
    Ok(LocalUser {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        username: row.try_get("username")?,
        avatar: row.try_get("avatar")?,
        status: UserStatus::parse(&status).ok_or_else(|| DatabaseError::InvalidData {
            field: "status",
            reason: format!("unknown user status '{status}'"),
        })?,
        verified: row.try_get("verified")?,
        auth_provider: row.try_get("auth_provider")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_role(row: &SqliteRow) -> Result<Role, DatabaseError> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        code: row.try_get("code")?,
    })
}

#[async_trait]
impl UserRepository for Database {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<LocalUser>, DatabaseError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user(&self, id: &str) -> Result<Option<LocalUser>, DatabaseError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn create_user(
        &self,
        user: &LocalUser,
        role_ids: &[String],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.avatar)
        .bind(user.status.as_str())
        .bind(user.verified)
        .bind(&user.auth_provider)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Conflict { reason, .. } => DatabaseError::Conflict {
                entity: "user",
                reason,
            },
            other => other,
        })?;

        for role_id in role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(&user.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, username = ?, avatar = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.username)
        .bind(&update.avatar)
        .bind(update.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound {
                entity: "user",
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    async fn get_user_roles(&self, user_id: &str) -> Result<Vec<Role>, DatabaseError> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.name, r.code
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = ?
            ORDER BY r.code
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_role).collect()
    }

    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>, DatabaseError> {
        let row = sqlx::query("SELECT id, name, code FROM roles WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_role).transpose()
    }

    async fn upsert_role(&self, code: &str, name: &str) -> Result<Role, DatabaseError> {
        sqlx::query(
            r"
            INSERT INTO roles (id, name, code) VALUES (?, ?, ?)
            ON CONFLICT(code) DO UPDATE SET name = excluded.name
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(code)
        .execute(&self.pool)
        .await?;

        self.get_role_by_code(code)
            .await?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "role",
                id: code.to_owned(),
            })
    }
}
