//! Schema for the users and posts tables
//!
//! Every statement is idempotent so this runs on each server start.

use sqlx::PgPool;

use super::DbError;

/// Create tables and indexes if they don't exist yet
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running roster migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT,
            published BOOLEAN NOT NULL DEFAULT FALSE,
            author_id TEXT NOT NULL REFERENCES users(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_posts_author_published ON posts(author_id) WHERE published",
    )
    .execute(pool)
    .await?;

    tracing::info!("Roster migrations complete");
    Ok(())
}
