//! User repository
//!
//! Handles user reads and natural-key inserts:
//! - find_by_email: lookup on the unique email column
//! - insert: INSERT with ON CONFLICT (email) DO NOTHING
//! - list: all users in creation order

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{DisplayName, Email};

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user; the id is generated on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: Option<DisplayName>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Insert hit the natural key but the winning row could not be read back
    #[error("conflict: {resource} '{key}' exists but could not be read")]
    Conflict { resource: &'static str, key: String },
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user with a fresh id.
    ///
    /// Returns `None` when a user with the same email already exists;
    /// the existing row is left untouched.
    pub async fn insert(&self, new: &NewUser) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(new.email.as_str())
        .bind(new.name.as_ref().map(DisplayName::as_str))
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, oldest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, created_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}
