use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// A comment with its author's username, for the post page.
#[derive(Debug, Serialize, FromRow)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_username: String,
}

impl CommentView {
    /// Oldest first.
    pub async fn list_for_post(
        pool: &SqlitePool,
        post_id: i64,
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.text, c.created, u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }
}

impl Comment {
    pub async fn create(
        pool: &SqlitePool,
        post_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (post_id, author_id, text, created)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
