use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use axum_extra::extract::WithRejection;
use minijinja::context;
use sqlx::SqlitePool;

use crate::{
    config::FEED_PAGE_SIZE,
    error::AppError,
    models::{
        group::Group,
        post::{PostScope, PostView},
    },
    pagination::{PageParams, Paginator},
    templates,
    utils::jwt::CurrentUser,
};

/// Posts tagged with one group, ten per page.
pub async fn group_posts(
    State(pool): State<SqlitePool>,
    CurrentUser(viewer): CurrentUser,
    Path(slug): Path<String>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Html<String>, AppError> {
    let group = Group::find_by_slug(&pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Group not found".to_string()))?;

    let scope = PostScope::Group(group.id);
    let paginator = Paginator::new(PostView::count(&pool, scope).await?, FEED_PAGE_SIZE);
    let number = paginator.resolve(params.page.as_deref());
    let posts = PostView::list(&pool, scope, paginator.per_page, paginator.offset(number)).await?;

    templates::render(
        "group.html",
        context! {
            user => viewer,
            group => group,
            page => paginator.page(number, posts),
        },
    )
}
