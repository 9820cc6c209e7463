// src/models/post.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: i64,
    pub text: String,

    /// Set once at creation, never updated.
    pub pub_date: DateTime<Utc>,

    /// Path of the uploaded image relative to the media root.
    pub image: Option<String>,

    pub author_id: i64,
    pub group_id: Option<i64>,
}

/// A post joined with what listings display: author name, group and
/// comment count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub comments_count: i64,
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Group(i64),
    Author(i64),
    /// Posts by every author the given user follows.
    FollowedBy(i64),
}

const POST_VIEW_SELECT: &str = r#"
    SELECT
        p.id, p.text, p.pub_date, p.image,
        p.author_id, u.username AS author_username,
        p.group_id, g.slug AS group_slug, g.title AS group_title,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
"#;

fn push_scope(query: &mut QueryBuilder<'_, Sqlite>, scope: PostScope) {
    match scope {
        PostScope::All => {}
        PostScope::Group(group_id) => {
            query.push(" WHERE p.group_id = ").push_bind(group_id);
        }
        PostScope::Author(author_id) => {
            query.push(" WHERE p.author_id = ").push_bind(author_id);
        }
        PostScope::FollowedBy(user_id) => {
            query
                .push(" WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

impl PostView {
    pub async fn count(pool: &SqlitePool, scope: PostScope) -> Result<i64, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts p");
        push_scope(&mut query, scope);
        query.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Newest first; ids break ties between posts sharing a timestamp.
    pub async fn list(
        pool: &SqlitePool,
        scope: PostScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new(POST_VIEW_SELECT);
        push_scope(&mut query, scope);
        query
            .push(" ORDER BY p.pub_date DESC, p.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        query.build_query_as::<PostView>().fetch_all(pool).await
    }

    /// A post, but only if `author_id` wrote it.
    pub async fn find_for_author(
        pool: &SqlitePool,
        author_id: i64,
        post_id: i64,
    ) -> Result<Option<PostView>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new(POST_VIEW_SELECT);
        query
            .push(" WHERE p.id = ")
            .push_bind(post_id)
            .push(" AND p.author_id = ")
            .push_bind(author_id);
        query.build_query_as::<PostView>().fetch_optional(pool).await
    }
}

/// Validated data for a new post. The author comes from the session.
#[derive(Debug)]
pub struct NewPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
    pub author_id: i64,
}

impl NewPost {
    pub async fn insert(&self, pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO posts (text, pub_date, image, author_id, group_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&self.text)
        .bind(Utc::now())
        .bind(&self.image)
        .bind(self.author_id)
        .bind(self.group_id)
        .fetch_one(pool)
        .await
    }
}

impl Post {
    /// Rewrites the editable fields. Author and publication date are untouched.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        text: &str,
        group_id: Option<i64>,
        image: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET text = ?, group_id = ?, image = ? WHERE id = ?")
            .bind(text)
            .bind(group_id)
            .bind(image)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
