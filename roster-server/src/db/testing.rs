//! Test-only stores

use async_trait::async_trait;

use super::repos::{DbError, NewPost, NewUser, Post, User};
use super::store::RosterStore;
use crate::models::{Email, PostId};

/// Store whose every call fails as if the pool were gone
pub(crate) struct BrokenStore;

fn closed() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolClosed)
}

#[async_trait]
impl RosterStore for BrokenStore {
    async fn find_user_by_email(&self, _: &Email) -> Result<Option<User>, DbError> {
        Err(closed())
    }

    async fn insert_user(&self, _: &NewUser) -> Result<Option<User>, DbError> {
        Err(closed())
    }

    async fn find_post(&self, _: &PostId) -> Result<Option<Post>, DbError> {
        Err(closed())
    }

    async fn insert_post(&self, _: &NewPost) -> Result<Option<Post>, DbError> {
        Err(closed())
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        Err(closed())
    }

    async fn list_published_posts(&self, _: &[String]) -> Result<Vec<Post>, DbError> {
        Err(closed())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Err(closed())
    }
}
