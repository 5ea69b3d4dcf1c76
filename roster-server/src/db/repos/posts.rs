//! Post repository
//!
//! Posts are keyed by a caller-chosen id. Listing only ever returns
//! published posts; there is no query for drafts.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::{PostId, PostTitle};
use super::DbError;

/// Post record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: String,
}

/// Fields needed to create a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: PostId,
    pub title: PostTitle,
    pub content: Option<String>,
    pub published: bool,
    pub author_id: String,
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a post by id.
    pub async fn find(&self, id: &PostId) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, author_id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Insert a post.
    ///
    /// Returns `None` when a post with the same id already exists.
    /// A missing author fails with the foreign-key violation from the store.
    pub async fn insert(&self, new: &NewPost) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, content, published, author_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, title, content, published, author_id
            "#,
        )
        .bind(new.id.as_str())
        .bind(new.title.as_str())
        .bind(new.content.as_deref())
        .bind(new.published)
        .bind(&new.author_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    /// Published posts for the given authors, in a single query (no N+1).
    pub async fn list_published_for_authors(
        &self,
        author_ids: &[String],
    ) -> Result<Vec<Post>, DbError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, author_id
            FROM posts
            WHERE published AND author_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(author_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{NewUser, UserRepo};
    use crate::db::{create_pool, migrations};
    use crate::models::Email;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn drafts_are_not_listed() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");

        let email = Email::new(&format!("{}@posts-test.example.com", Uuid::new_v4())).unwrap();
        let author = UserRepo::new(&pool)
            .insert(&NewUser { email, name: None })
            .await
            .expect("insert failed")
            .expect("user should be created");

        let repo = PostRepo::new(&pool);
        let suffix = Uuid::new_v4().simple().to_string();
        for (slug, published) in [("live", true), ("draft", false)] {
            repo.insert(&NewPost {
                id: PostId::new(&format!("{}-{}", slug, suffix)).unwrap(),
                title: PostTitle::new(slug).unwrap(),
                content: None,
                published,
                author_id: author.id.clone(),
            })
            .await
            .expect("insert failed");
        }

        let posts = repo
            .list_published_for_authors(&[author.id.clone()])
            .await
            .expect("list failed");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "live");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_with_unknown_author_fails() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");

        let result = PostRepo::new(&pool)
            .insert(&NewPost {
                id: PostId::new(&format!("orphan-{}", Uuid::new_v4().simple())).unwrap(),
                title: PostTitle::new("Orphan").unwrap(),
                content: None,
                published: true,
                author_id: "no-such-user".into(),
            })
            .await;
        assert!(matches!(result, Err(DbError::Sqlx(_))));
    }
}
