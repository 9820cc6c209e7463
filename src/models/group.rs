// src/models/group.rs

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// A community posts can be tagged with. Its slug is part of public URLs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM post_groups WHERE slug = ?")
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM post_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All groups, alphabetically. Feeds the group choice on the post form.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT id, title, slug, description FROM post_groups ORDER BY title")
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO post_groups (title, slug, description) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(slug)
        .bind(description)
        .fetch_one(pool)
        .await
    }
}
