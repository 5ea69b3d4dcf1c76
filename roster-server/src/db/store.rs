//! Storage seam between the seed procedure / page handlers and the database
//!
//! `PgStore` is the production implementation. `MemoryStore` (see
//! `memory.rs`) backs the unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::{Email, PostId};
use super::repos::{DbError, NewPost, NewUser, Post, PostRepo, User, UserRepo};

/// Operations the roster needs from its store.
///
/// Inserts are keyed on natural keys (email for users, id for posts) and
/// return `Ok(None)` when a row with that key already exists.
#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, DbError>;

    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, DbError>;

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, DbError>;

    async fn insert_post(&self, post: &NewPost) -> Result<Option<Post>, DbError>;

    /// All users in the store's default order.
    async fn list_users(&self) -> Result<Vec<User>, DbError>;

    /// Published posts written by any of `author_ids`.
    async fn list_published_posts(&self, author_ids: &[String]) -> Result<Vec<Post>, DbError>;

    /// Cheap reachability check used by `GET /health`.
    async fn ping(&self) -> Result<(), DbError>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RosterStore for PgStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, DbError> {
        UserRepo::new(&self.pool).find_by_email(email).await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, DbError> {
        UserRepo::new(&self.pool).insert(user).await
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, DbError> {
        PostRepo::new(&self.pool).find(id).await
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Option<Post>, DbError> {
        PostRepo::new(&self.pool).insert(post).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        UserRepo::new(&self.pool).list().await
    }

    async fn list_published_posts(&self, author_ids: &[String]) -> Result<Vec<Post>, DbError> {
        PostRepo::new(&self.pool)
            .list_published_for_authors(author_ids)
            .await
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A user with their published posts attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
}

/// Load every user with only their published posts.
///
/// Two reads: users, then published posts for those users grouped by
/// author. User order is the store's order.
pub async fn load_users_with_published_posts(
    store: &dyn RosterStore,
) -> Result<Vec<UserWithPosts>, DbError> {
    let users = store.list_users().await?;
    let author_ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    let posts = store.list_published_posts(&author_ids).await?;

    tracing::debug!(users = users.len(), posts = posts.len(), "loaded user listing");
    Ok(attach_posts(users, posts))
}

/// Group posts under their authors, dropping anything unpublished.
fn attach_posts(users: Vec<User>, posts: Vec<Post>) -> Vec<UserWithPosts> {
    let mut by_author: HashMap<String, Vec<Post>> = HashMap::new();
    for post in posts.into_iter().filter(|p| p.published) {
        by_author.entry(post.author_id.clone()).or_default().push(post);
    }

    users
        .into_iter()
        .map(|user| {
            let posts = by_author.remove(&user.id).unwrap_or_default();
            UserWithPosts { user, posts }
        })
        .collect()
}
