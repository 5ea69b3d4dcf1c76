//! Idempotent seeding of one sample user and one sample post
//!
//! Each record is resolved by natural key: look it up, insert it if
//! missing, never update it. Re-running the seed is a no-op.

use serde::Serialize;

use crate::db::{DbError, NewPost, NewUser, Post, RosterStore, User};
use crate::models::{DisplayName, Email, PostId, PostTitle, ValidationError};

/// Whether an ensured record was just inserted or already there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Created,
    Found,
}

/// A record resolved by `ensure_*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upserted<T> {
    #[serde(flatten)]
    pub record: T,
    pub resolution: Resolution,
}

impl<T> Upserted<T> {
    fn created(record: T) -> Self {
        Self {
            record,
            resolution: Resolution::Created,
        }
    }

    fn found(record: T) -> Self {
        Self {
            record,
            resolution: Resolution::Found,
        }
    }
}

/// Result of a full seed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seeded {
    pub user: Upserted<User>,
    pub post: Upserted<Post>,
}

/// Raw seed input, validated by `seed`
#[derive(Debug, Clone)]
pub struct SeedData {
    pub email: String,
    pub name: Option<String>,
    pub post_id: String,
    pub post_title: String,
    pub post_content: Option<String>,
    pub published: bool,
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            email: "test@example.com".to_string(),
            name: Some("Test User".to_string()),
            post_id: "test-post-1".to_string(),
            post_title: "Welcome to roster!".to_string(),
            post_content: Some("This is a sample post created during database seeding.".to_string()),
            published: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid seed data: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Find a user by email, creating it if absent. An existing user is
/// returned unchanged even if `name` differs.
pub async fn ensure_user(
    store: &dyn RosterStore,
    email: &Email,
    name: Option<&DisplayName>,
) -> Result<Upserted<User>, DbError> {
    if let Some(user) = store.find_user_by_email(email).await? {
        return Ok(Upserted::found(user));
    }

    let new = NewUser {
        email: email.clone(),
        name: name.cloned(),
    };
    if let Some(user) = store.insert_user(&new).await? {
        return Ok(Upserted::created(user));
    }

    // Another writer inserted between our lookup and insert.
    store
        .find_user_by_email(email)
        .await?
        .map(Upserted::found)
        .ok_or_else(|| DbError::Conflict {
            resource: "user",
            key: email.as_str().to_owned(),
        })
}

/// Find a post by id, creating it if absent. An existing post is
/// returned unchanged.
pub async fn ensure_post(
    store: &dyn RosterStore,
    post: &NewPost,
) -> Result<Upserted<Post>, DbError> {
    if let Some(existing) = store.find_post(&post.id).await? {
        return Ok(Upserted::found(existing));
    }

    if let Some(created) = store.insert_post(post).await? {
        return Ok(Upserted::created(created));
    }

    store
        .find_post(&post.id)
        .await?
        .map(Upserted::found)
        .ok_or_else(|| DbError::Conflict {
            resource: "post",
            key: post.id.as_str().to_owned(),
        })
}

/// Ensure the sample user, then the sample post authored by them.
pub async fn seed(store: &dyn RosterStore, data: &SeedData) -> Result<Seeded, SeedError> {
    let email = Email::new(&data.email)?;
    let name = data.name.as_deref().map(DisplayName::new).transpose()?;
    let post_id = PostId::new(&data.post_id)?;
    let title = PostTitle::new(&data.post_title)?;

    let user = ensure_user(store, &email, name.as_ref()).await?;
    tracing::info!(
        id = %user.record.id,
        email = %user.record.email,
        resolution = ?user.resolution,
        "seed user resolved"
    );

    let new_post = NewPost {
        id: post_id,
        title,
        content: data.post_content.clone(),
        published: data.published,
        author_id: user.record.id.clone(),
    };
    let post = ensure_post(store, &new_post).await?;
    tracing::info!(
        id = %post.record.id,
        author_id = %post.record.author_id,
        resolution = ?post.resolution,
        "seed post resolved"
    );

    Ok(Seeded { user, post })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use async_trait::async_trait;

    use crate::db::MemoryStore;

    #[tokio::test]
    async fn first_run_creates_both_records() {
        let store = MemoryStore::new();
        let seeded = seed(&store, &SeedData::default()).await.unwrap();

        assert_eq!(seeded.user.resolution, Resolution::Created);
        assert_eq!(seeded.post.resolution, Resolution::Created);
        assert_eq!(seeded.user.record.email, "test@example.com");
        assert_eq!(seeded.user.record.name.as_deref(), Some("Test User"));
        assert_eq!(seeded.post.record.id, "test-post-1");
        assert!(seeded.post.record.published);
    }

    #[tokio::test]
    async fn seeding_twice_is_idempotent() {
        let store = MemoryStore::new();
        let first = seed(&store, &SeedData::default()).await.unwrap();
        let second = seed(&store, &SeedData::default()).await.unwrap();

        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.post_count().await, 1);
        assert_eq!(second.user.resolution, Resolution::Found);
        assert_eq!(second.post.resolution, Resolution::Found);
        assert_eq!(first.user.record, second.user.record);
        assert_eq!(first.post.record, second.post.record);
    }

    #[tokio::test]
    async fn post_author_is_seeded_user() {
        let store = MemoryStore::new();
        let seeded = seed(&store, &SeedData::default()).await.unwrap();
        assert_eq!(seeded.post.record.author_id, seeded.user.record.id);
    }

    #[tokio::test]
    async fn existing_user_is_not_updated() {
        let store = MemoryStore::new();
        let email = Email::new("test@example.com").unwrap();
        let original = ensure_user(&store, &email, None).await.unwrap();

        let data = SeedData {
            name: Some("Someone Else".into()),
            ..SeedData::default()
        };
        let seeded = seed(&store, &data).await.unwrap();

        assert_eq!(seeded.user.resolution, Resolution::Found);
        assert_eq!(seeded.user.record, original.record);
        assert_eq!(seeded.user.record.name, None);
    }

    #[tokio::test]
    async fn existing_post_is_not_updated() {
        let store = MemoryStore::new();
        seed(&store, &SeedData::default()).await.unwrap();

        let data = SeedData {
            post_title: "A different title".into(),
            published: false,
            ..SeedData::default()
        };
        let seeded = seed(&store, &data).await.unwrap();

        assert_eq!(seeded.post.resolution, Resolution::Found);
        assert_eq!(seeded.post.record.title, "Welcome to roster!");
        assert!(seeded.post.record.published);
    }

    #[tokio::test]
    async fn invalid_email_touches_nothing() {
        let store = MemoryStore::new();
        let data = SeedData {
            email: "not-an-email".into(),
            ..SeedData::default()
        };

        let err = seed(&store, &data).await.unwrap_err();
        assert!(matches!(err, SeedError::Validation(ValidationError::InvalidFormat { .. })));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn seeded_json_has_user_and_post() {
        let store = MemoryStore::new();
        let seeded = seed(&store, &SeedData::default()).await.unwrap();
        let json = serde_json::to_value(&seeded).unwrap();

        assert_eq!(json["user"]["email"], "test@example.com");
        assert_eq!(json["user"]["resolution"], "created");
        assert_eq!(json["post"]["author_id"], json["user"]["id"]);
    }

    /// Wraps `MemoryStore` so another writer lands its row during the
    /// first lookup of a user and/or post. With `blind` set, later lookups
    /// never see any row.
    struct RacingStore {
        inner: MemoryStore,
        race_users: bool,
        race_posts: bool,
        blind: bool,
        user_raced: AtomicBool,
        post_raced: AtomicBool,
    }

    impl RacingStore {
        fn new(race_users: bool, race_posts: bool, blind: bool) -> Self {
            Self {
                inner: MemoryStore::new(),
                race_users,
                race_posts,
                blind,
                user_raced: AtomicBool::new(false),
                post_raced: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RosterStore for RacingStore {
        async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, DbError> {
            if self.race_users && !self.user_raced.swap(true, Ordering::SeqCst) {
                self.inner
                    .insert_user(&NewUser {
                        email: email.clone(),
                        name: Some(DisplayName::new("Rival").unwrap()),
                    })
                    .await?;
                return Ok(None);
            }
            if self.blind {
                return Ok(None);
            }
            self.inner.find_user_by_email(email).await
        }

        async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, DbError> {
            self.inner.insert_user(user).await
        }

        async fn find_post(&self, id: &PostId) -> Result<Option<Post>, DbError> {
            if self.race_posts && !self.post_raced.swap(true, Ordering::SeqCst) {
                let author = self.inner.list_users().await?.remove(0);
                self.inner
                    .insert_post(&NewPost {
                        id: id.clone(),
                        title: PostTitle::new("Rival post").unwrap(),
                        content: None,
                        published: true,
                        author_id: author.id,
                    })
                    .await?;
                return Ok(None);
            }
            if self.blind {
                return Ok(None);
            }
            self.inner.find_post(id).await
        }

        async fn insert_post(&self, post: &NewPost) -> Result<Option<Post>, DbError> {
            self.inner.insert_post(post).await
        }

        async fn list_users(&self) -> Result<Vec<User>, DbError> {
            self.inner.list_users().await
        }

        async fn list_published_posts(&self, author_ids: &[String]) -> Result<Vec<Post>, DbError> {
            self.inner.list_published_posts(author_ids).await
        }

        async fn ping(&self) -> Result<(), DbError> {
            self.inner.ping().await
        }
    }

    #[tokio::test]
    async fn lost_user_race_resolves_to_the_winners_row() {
        let store = RacingStore::new(true, false, false);
        let seeded = seed(&store, &SeedData::default()).await.unwrap();

        assert_eq!(seeded.user.resolution, Resolution::Found);
        assert_eq!(seeded.user.record.name.as_deref(), Some("Rival"));
        assert_eq!(store.inner.user_count().await, 1);
        assert_eq!(seeded.post.resolution, Resolution::Created);
        assert_eq!(seeded.post.record.author_id, seeded.user.record.id);
    }

    #[tokio::test]
    async fn lost_post_race_resolves_to_the_winners_row() {
        let store = RacingStore::new(false, true, false);
        let seeded = seed(&store, &SeedData::default()).await.unwrap();

        assert_eq!(seeded.user.resolution, Resolution::Created);
        assert_eq!(seeded.post.resolution, Resolution::Found);
        assert_eq!(seeded.post.record.title, "Rival post");
        assert_eq!(store.inner.post_count().await, 1);
        assert_eq!(seeded.post.record.author_id, seeded.user.record.id);
    }

    #[tokio::test]
    async fn user_missing_after_conflicting_insert_is_a_conflict() {
        let store = RacingStore::new(true, false, true);
        let email = Email::new("test@example.com").unwrap();

        let err = ensure_user(&store, &email, None).await.unwrap_err();
        match err {
            DbError::Conflict { resource, key } => {
                assert_eq!(resource, "user");
                assert_eq!(key, "test@example.com");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.inner.user_count().await, 1);
    }

    #[tokio::test]
    async fn post_missing_after_conflicting_insert_is_a_conflict() {
        let store = RacingStore::new(false, true, true);
        let author = store
            .inner
            .insert_user(&NewUser {
                email: Email::new("test@example.com").unwrap(),
                name: None,
            })
            .await
            .unwrap()
            .unwrap();
        let post = NewPost {
            id: PostId::new("test-post-1").unwrap(),
            title: PostTitle::new("Welcome to roster!").unwrap(),
            content: None,
            published: true,
            author_id: author.id,
        };

        let err = ensure_post(&store, &post).await.unwrap_err();
        match err {
            DbError::Conflict { resource, key } => {
                assert_eq!(resource, "post");
                assert_eq!(key, "test-post-1");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.inner.post_count().await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pg_seeding_twice_is_idempotent() {
        use crate::db::{create_pool, migrations, PgStore};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        let store = PgStore::new(pool.clone());

        let first = seed(&store, &SeedData::default()).await.expect("first seed failed");
        let second = seed(&store, &SeedData::default()).await.expect("second seed failed");
        assert_eq!(second.user.resolution, Resolution::Found);
        assert_eq!(first.user.record.id, second.user.record.id);

        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind("test@example.com")
            .fetch_one(&pool)
            .await
            .expect("count failed");
        let (posts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE id = $1")
            .bind("test-post-1")
            .fetch_one(&pool)
            .await
            .expect("count failed");
        assert_eq!((users, posts), (1, 1));
    }
}
