// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;

/// Posts per page on the index and group feeds.
pub const FEED_PAGE_SIZE: i64 = 10;

/// Posts per page on profiles and the follow feed.
pub const PROFILE_PAGE_SIZE: i64 = 5;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "yatube_session";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: String,
    /// Directory uploaded images are written to, served under `/media/`.
    pub media_root: PathBuf,
    /// TTL of the cached index fragment. Zero disables caching.
    pub index_cache_seconds: u64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://yatube.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let media_root = env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("media"));

        let index_cache_seconds = env::var("INDEX_CACHE_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            media_root,
            index_cache_seconds,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
