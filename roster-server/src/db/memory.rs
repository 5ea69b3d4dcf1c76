//! In-process store with the same constraints as the schema
//!
//! Enforces email uniqueness, post id uniqueness and the author foreign
//! key. Used by tests and anywhere a database is not available.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{DisplayName, Email, PostId};
use super::repos::{DbError, NewPost, NewUser, Post, User};
use super::store::RosterStore;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
}

/// In-memory `RosterStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    /// Number of stored posts, published or not
    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

#[async_trait]
impl RosterStore for MemoryStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email.as_str())
            .cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, DbError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email.as_str()) {
            return Ok(None);
        }

        let record = User {
            id: Uuid::new_v4().to_string(),
            email: user.email.as_str().to_owned(),
            name: user.name.clone().map(DisplayName::into_string),
            created_at: Utc::now(),
        };
        tables.users.push(record.clone());
        Ok(Some(record))
    }

    async fn find_post(&self, id: &PostId) -> Result<Option<Post>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id.as_str()).cloned())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<Option<Post>, DbError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.id == post.id.as_str()) {
            return Ok(None);
        }

        if !tables.users.iter().any(|u| u.id == post.author_id) {
            return Err(DbError::NotFound {
                resource: "user",
                id: post.author_id.clone(),
            });
        }

        let record = Post {
            id: post.id.as_str().to_owned(),
            title: post.title.as_str().to_owned(),
            content: post.content.clone(),
            published: post.published,
            author_id: post.author_id.clone(),
        };
        tables.posts.push(record.clone());
        Ok(Some(record))
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_published_posts(&self, author_ids: &[String]) -> Result<Vec<Post>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.published && author_ids.contains(&p.author_id))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
