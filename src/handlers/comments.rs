use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use minijinja::context;
use sqlx::SqlitePool;

use super::{get_user_or_404, parse_post_id, post_url, redirect};
use crate::{
    error::AppError,
    forms::comment::CommentForm,
    models::{comment::Comment, post::PostView},
    templates,
    utils::jwt::{RequireUser, SessionUser},
};

async fn find_post(pool: &SqlitePool, username: &str, raw_post_id: &str) -> Result<PostView, AppError> {
    let post_id = parse_post_id(raw_post_id)?;
    let author = get_user_or_404(pool, username).await?;
    PostView::find_for_author(pool, author.id, post_id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))
}

fn render_comment_form(
    user: &SessionUser,
    post: &PostView,
    form: &CommentForm,
) -> Result<Html<String>, AppError> {
    templates::render(
        "comments.html",
        context! { user => user, post => post, form => form },
    )
}

/// Standalone comment form.
pub async fn comment_page(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let post = find_post(&pool, &username, &post_id).await?;
    render_comment_form(&user, &post, &CommentForm::default())
}

/// Attaches a comment by the current user to the post, then shows the post.
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    Path((username, post_id)): Path<(String, String)>,
    WithRejection(Form(mut form), _): WithRejection<Form<CommentForm>, AppError>,
) -> Result<Response, AppError> {
    let post = find_post(&pool, &username, &post_id).await?;

    let Some(text) = form.clean() else {
        return Ok(render_comment_form(&user, &post, &form)?.into_response());
    };

    let comment_id = Comment::create(&pool, post.id, user.id, &text).await?;
    tracing::info!(comment_id, post_id = post.id, "Comment added");

    Ok(redirect(&post_url(&post.author_username, post.id)))
}
