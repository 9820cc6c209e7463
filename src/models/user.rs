// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,

    /// Unique username, also the first URL segment of profile pages.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, role, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}

/// Author header shown on profiles and post pages.
/// All counts are computed at read time.
#[derive(Debug, Serialize, FromRow)]
pub struct ProfileCard {
    pub id: i64,
    pub username: String,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    /// Whether the viewing user follows this author.
    pub following: bool,
}

impl ProfileCard {
    pub async fn load(
        pool: &SqlitePool,
        author: &User,
        viewer_id: Option<i64>,
    ) -> Result<ProfileCard, sqlx::Error> {
        sqlx::query_as::<_, ProfileCard>(
            r#"
            SELECT
                u.id, u.username,
                (SELECT COUNT(*) FROM posts WHERE author_id = u.id) AS posts_count,
                (SELECT COUNT(*) FROM follows WHERE author_id = u.id) AS followers_count,
                (SELECT COUNT(*) FROM follows WHERE user_id = u.id) AS following_count,
                EXISTS (
                    SELECT 1 FROM follows WHERE author_id = u.id AND user_id = ?
                ) AS following
            FROM users u
            WHERE u.id = ?
            "#,
        )
        .bind(viewer_id)
        .bind(author.id)
        .fetch_one(pool)
        .await
    }
}
