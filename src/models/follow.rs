use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Represents the 'follows' table: `user_id` reads the posts of `author_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
}

impl Follow {
    /// Returns whether a row was created. An existing pair is left alone, and
    /// the unique index keeps concurrent requests from duplicating it.
    pub async fn create(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
