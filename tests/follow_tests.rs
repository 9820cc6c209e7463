// tests/follow_tests.rs

mod common;

use common::{location, spawn_app};
use yatube::models::follow::Follow;

#[tokio::test]
async fn follow_then_unfollow_changes_the_feed() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    let response = client.get(app.url("/user_2/follow/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/user_2/");

    let (status, body) = app.get(&client, "/follow/").await;
    assert_eq!(status, 200);
    assert!(body.contains("lalala"));

    client.get(app.url("/user_2/unfollow/")).send().await.unwrap();
    let (_, body) = app.get(&client, "/follow/").await;
    assert!(!body.contains("lalala"));
}

#[tokio::test]
async fn follow_feed_only_shows_followed_authors() {
    let app = spawn_app().await;
    let followed = app.create_user("user_2").await;
    app.create_post(followed.id, "lalala").await;
    let stranger = app.create_user("user_3").await;
    app.create_post(stranger.id, "hello").await;
    let client = app.signup("user_test").await;

    client.get(app.url("/user_2/follow/")).send().await.unwrap();

    let (_, body) = app.get(&client, "/follow/").await;
    assert!(body.contains("lalala"));
    assert!(!body.contains("hello"));
}

#[tokio::test]
async fn follow_and_unfollow_are_idempotent() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    let client = app.signup("user_test").await;
    let me = app.user("user_test").await;

    for _ in 0..2 {
        let response = client.get(app.url("/user_2/follow/")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 302);
    }
    assert!(app.is_following(me.id, author.id).await);

    let (_, body) = app.get(&client, "/user_2/").await;
    assert!(body.contains("Followers: <span class=\"followers-count\">1</span>"));
    assert!(body.contains("Unfollow"));

    for _ in 0..2 {
        let response = client.post(app.url("/user_2/unfollow/")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 302);
    }
    assert!(!app.is_following(me.id, author.id).await);

    let (_, body) = app.get(&client, "/user_2/").await;
    assert!(body.contains("Followers: <span class=\"followers-count\">0</span>"));
}

#[tokio::test]
async fn self_follow_is_a_no_op() {
    let app = spawn_app().await;
    let client = app.signup("user_test").await;
    let me = app.user("user_test").await;

    let response = client.get(app.url("/user_test/follow/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/user_test/");
    assert!(!app.is_following(me.id, me.id).await);
}

#[tokio::test]
async fn profile_counts_are_computed() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    let other = app.create_user("user_3").await;
    app.create_post(author.id, "one").await;
    app.create_post(author.id, "two").await;
    Follow::create(&app.pool, author.id, other.id).await.unwrap();
    Follow::create(&app.pool, other.id, author.id).await.unwrap();

    let (_, body) = app.get(&app.client(), "/user_2/").await;

    assert!(body.contains("<span class=\"posts-count\">2</span>"));
    assert!(body.contains("<span class=\"followers-count\">1</span>"));
    assert!(body.contains("<span class=\"following-count\">1</span>"));
    assert!(!body.contains("Unfollow"), "anonymous viewers get no follow buttons");
}

#[tokio::test]
async fn follow_routes_require_login() {
    let app = spawn_app().await;
    app.create_user("user_2").await;
    let client = app.client();

    for (path, next) in [
        ("/user_2/follow/", "/user_2/follow/"),
        ("/user_2/unfollow/", "/user_2/unfollow/"),
        ("/follow/", "/follow/"),
    ] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 302);
        assert_eq!(location(&response), format!("/auth/login/?next={}", next));
    }
}

#[tokio::test]
async fn following_unknown_user_is_404() {
    let app = spawn_app().await;
    let client = app.signup("user_test").await;

    let (status, _) = app.get(&client, "/nobody/follow/").await;
    assert_eq!(status, 404);
}
