// tests/common/mod.rs

#![allow(dead_code)]

use std::io::Cursor;
use std::str::FromStr;

use image::{ImageBuffer, ImageFormat, Rgb};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use yatube::{
    config::Config,
    models::{
        group::Group,
        post::NewPost,
        user::User,
    },
    routes,
    state::AppState,
};

pub const PASSWORD: &str = "password123";

pub struct TestApp {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub address: String,
    pub state: AppState,
    pub pool: SqlitePool,
    _media: TempDir,
}

/// Spawns the app on a random port over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // A single connection that never recycles keeps the in-memory database alive.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let media = tempfile::tempdir().expect("Failed to create media dir");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        media_root: media.path().to_path_buf(),
        index_cache_seconds: 20,
        admin_username: None,
        admin_password: None,
    };

    let state = AppState::new(pool.clone(), config);
    let app = routes::create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        state,
        pool,
        _media: media,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Anonymous client that keeps cookies and never follows redirects.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }

    /// Registers `username` through the signup page and returns its logged-in client.
    pub async fn signup(&self, username: &str) -> reqwest::Client {
        let client = self.client();
        let response = client
            .post(self.url("/auth/signup/"))
            .form(&[
                ("username", username),
                ("password", PASSWORD),
                ("password_confirm", PASSWORD),
            ])
            .send()
            .await
            .expect("Signup failed");
        assert_eq!(response.status().as_u16(), 302, "signup of {} failed", username);
        client
    }

    /// Inserts a user directly; it cannot log in.
    pub async fn create_user(&self, username: &str) -> User {
        User::create(&self.pool, username, "unusable", "user")
            .await
            .unwrap()
    }

    pub async fn user(&self, username: &str) -> User {
        User::find_by_username(&self.pool, username)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn create_post(&self, author_id: i64, text: &str) -> i64 {
        NewPost {
            text: text.to_string(),
            group_id: None,
            image: None,
            author_id,
        }
        .insert(&self.pool)
        .await
        .unwrap()
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> i64 {
        Group::create(&self.pool, title, slug, "test group")
            .await
            .unwrap()
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> bool {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    /// Number of rows in `table` matching `condition`, e.g. "author_id = 1".
    pub async fn count_rows(&self, table: &str, condition: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {} WHERE {}", table, condition))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// GET and return (status, body).
    pub async fn get(&self, client: &reqwest::Client, path: &str) -> (u16, String) {
        let response = client.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.text().await.unwrap())
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .expect("no Location header")
        .to_str()
        .unwrap()
}

pub fn count_posts(html: &str) -> usize {
    html.matches("<article class=\"post\">").count()
}

pub fn png_bytes() -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
