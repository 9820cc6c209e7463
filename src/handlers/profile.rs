use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use axum_extra::extract::WithRejection;
use minijinja::context;
use sqlx::SqlitePool;

use super::get_user_or_404;
use crate::{
    config::PROFILE_PAGE_SIZE,
    error::AppError,
    models::{
        post::{PostScope, PostView},
        user::ProfileCard,
    },
    pagination::{PageParams, Paginator},
    templates,
    utils::jwt::CurrentUser,
};

/// An author's posts, five per page, under their profile card.
pub async fn profile(
    State(pool): State<SqlitePool>,
    CurrentUser(viewer): CurrentUser,
    Path(username): Path<String>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Html<String>, AppError> {
    let author = get_user_or_404(&pool, &username).await?;
    let card = ProfileCard::load(&pool, &author, viewer.as_ref().map(|u| u.id)).await?;

    let scope = PostScope::Author(author.id);
    let paginator = Paginator::new(card.posts_count, PROFILE_PAGE_SIZE);
    let number = paginator.resolve(params.page.as_deref());
    let posts = PostView::list(&pool, scope, paginator.per_page, paginator.offset(number)).await?;

    templates::render(
        "profile.html",
        context! {
            user => viewer,
            profile => card,
            page => paginator.page(number, posts),
        },
    )
}
