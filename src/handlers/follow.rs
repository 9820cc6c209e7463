use axum::{
    extract::{Path, Query, State},
    response::{Html, Response},
};
use axum_extra::extract::WithRejection;
use minijinja::context;
use sqlx::SqlitePool;

use super::{get_user_or_404, profile_url, redirect};
use crate::{
    config::PROFILE_PAGE_SIZE,
    error::AppError,
    models::{
        follow::Follow,
        post::{PostScope, PostView},
    },
    pagination::{PageParams, Paginator},
    templates,
    utils::jwt::RequireUser,
};

/// Posts by everyone the current user follows, five per page.
pub async fn follow_index(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Html<String>, AppError> {
    let scope = PostScope::FollowedBy(user.id);
    let paginator = Paginator::new(PostView::count(&pool, scope).await?, PROFILE_PAGE_SIZE);
    let number = paginator.resolve(params.page.as_deref());
    let posts = PostView::list(&pool, scope, paginator.per_page, paginator.offset(number)).await?;

    templates::render(
        "follow.html",
        context! {
            user => user,
            page => paginator.page(number, posts),
        },
    )
}

/// Follows `username`. Following yourself or someone already followed
/// changes nothing.
pub async fn profile_follow(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = get_user_or_404(&pool, &username).await?;

    if author.id != user.id && Follow::create(&pool, user.id, author.id).await? {
        tracing::info!(follower = %user.username, author = %author.username, "Follow created");
    }

    Ok(redirect(&profile_url(&author.username)))
}

/// Stops following `username`; a no-op if there was nothing to undo.
pub async fn profile_unfollow(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    let author = get_user_or_404(&pool, &username).await?;

    if Follow::delete(&pool, user.id, author.id).await? {
        tracing::info!(follower = %user.username, author = %author.username, "Follow removed");
    }

    Ok(redirect(&profile_url(&author.username)))
}
