// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod comments;
pub mod follow;
pub mod groups;
pub mod misc;
pub mod posts;
pub mod profile;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use sqlx::SqlitePool;

use crate::{error::AppError, models::user::User};

/// Escaped in `Location` headers; non-ASCII is always escaped.
const LOCATION: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// `302 Found` to a local path.
pub fn redirect(location: &str) -> Response {
    let encoded = utf8_percent_encode(location, LOCATION).to_string();
    match HeaderValue::try_from(encoded) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => AppError::InternalServerError(e.to_string()).into_response(),
    }
}

pub fn profile_url(username: &str) -> String {
    format!("/{}/", username)
}

pub fn post_url(username: &str, post_id: i64) -> String {
    format!("/{}/{}/", username, post_id)
}

/// Post ids come from the path as text; anything non-numeric simply does not exist.
pub fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound("Post not found".to_string()))
}

pub async fn get_user_or_404(pool: &SqlitePool, username: &str) -> Result<User, AppError> {
    User::find_by_username(pool, username)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}
