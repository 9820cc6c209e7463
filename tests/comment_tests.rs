// tests/comment_tests.rs

mod common;

use common::{location, spawn_app};

#[tokio::test]
async fn authenticated_user_can_comment() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    let response = client
        .post(app.url("/user_2/1/comment/"))
        .form(&[("text", "hello")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/user_2/1/");

    let (status, body) = app.get(&client, "/user_2/1/").await;
    assert_eq!(status, 200);
    assert!(body.contains("hello"));
    assert!(body.contains("@user_test"));
}

#[tokio::test]
async fn anonymous_comment_redirects_to_login() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_post(author.id, "lalala").await;
    let client = app.client();

    let response = client.get(app.url("/user_2/1/comment/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/auth/login/?next=/user_2/1/comment/");

    let response = client
        .post(app.url("/user_2/1/comment/"))
        .form(&[("text", "drive-by")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 302);

    let (_, body) = app.get(&client, "/user_2/1/").await;
    assert!(!body.contains("drive-by"));
}

#[tokio::test]
async fn blank_comment_rerenders_form() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    let (status, _) = app.get(&client, "/user_2/1/comment/").await;
    assert_eq!(status, 200);

    let response = client
        .post(app.url("/user_2/1/comment/"))
        .form(&[("text", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.text().await.unwrap().contains("This field is required."));
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    for text in ["first comment", "second comment"] {
        client
            .post(app.url("/user_2/1/comment/"))
            .form(&[("text", text)])
            .send()
            .await
            .unwrap();
    }

    let (_, body) = app.get(&client, "/user_2/1/").await;
    let first = body.find("first comment").unwrap();
    let second = body.find("second comment").unwrap();
    assert!(first < second);
    assert!(body.contains("Comments: 2"));
}

#[tokio::test]
async fn comment_on_mismatched_post_is_404() {
    let app = spawn_app().await;
    let author = app.create_user("user_2").await;
    app.create_user("user_3").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    let response = client
        .post(app.url("/user_3/1/comment/"))
        .form(&[("text", "hello")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn comment_with_wrong_content_type_gets_the_error_page() {
    let app = spawn_app().await;
    let author = app.create_user("writer").await;
    app.create_post(author.id, "lalala").await;
    let client = app.signup("user_test").await;

    let response = client
        .post(app.url("/writer/1/comment/"))
        .multipart(reqwest::multipart::Form::new().text("text", "hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert!(response.text().await.unwrap().contains("Error 400"));

    let (_, body) = app.get(&client, "/writer/1/").await;
    assert!(!body.contains("hello"));
}
