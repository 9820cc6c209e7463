// src/handlers/posts.rs

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use minijinja::{Value, context};
use sqlx::SqlitePool;

use super::{get_user_or_404, parse_post_id, post_url, redirect};
use crate::{
    cache::FragmentCache,
    config::{Config, FEED_PAGE_SIZE},
    error::AppError,
    forms::{comment::CommentForm, post::PostForm},
    models::{
        comment::CommentView,
        group::Group,
        post::{NewPost, Post, PostScope, PostView},
        user::ProfileCard,
    },
    pagination::{PageParams, Paginator},
    templates,
    utils::{
        image::save_image,
        jwt::{CurrentUser, RequireUser, SessionUser},
    },
};

/// Index feed: every post, newest first, ten per page.
/// The post list fragment is served from the cache while fresh.
pub async fn index(
    State(pool): State<SqlitePool>,
    State(cache): State<Arc<FragmentCache>>,
    CurrentUser(viewer): CurrentUser,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Html<String>, AppError> {
    let generation = cache.generation();
    let paginator = Paginator::new(PostView::count(&pool, PostScope::All).await?, FEED_PAGE_SIZE);
    let number = paginator.resolve(params.page.as_deref());

    let page_key = number.to_string();
    let key = FragmentCache::key("index_page", &[page_key.as_str()]);
    let fragment = match cache.get(&key) {
        Some(fragment) => fragment,
        None => {
            let posts = PostView::list(
                &pool,
                PostScope::All,
                paginator.per_page,
                paginator.offset(number),
            )
            .await?;
            let page = paginator.page(number, posts);
            let fragment =
                templates::render_string("includes/index_page.html", context! { page => page })?;
            cache.insert(key, fragment.clone(), generation);
            fragment
        }
    };

    templates::render(
        "index.html",
        context! {
            user => viewer,
            index_page => Value::from_safe_string(fragment),
        },
    )
}

async fn render_post_form(
    pool: &SqlitePool,
    viewer: &SessionUser,
    form: &PostForm,
    post: Option<&PostView>,
) -> Result<Html<String>, AppError> {
    let groups = Group::list(pool).await?;
    templates::render(
        "new_post.html",
        context! {
            user => viewer,
            form => form,
            groups => groups,
            post => post,
        },
    )
}

/// Blank post form.
pub async fn new_post_page(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
) -> Result<Html<String>, AppError> {
    render_post_form(&pool, &user, &PostForm::default(), None).await
}

/// Creates a post owned by the current user and goes back to the index.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(cache): State<Arc<FragmentCache>>,
    RequireUser(user): RequireUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Response, AppError> {
    let mut form = PostForm::from_multipart(multipart).await?;

    let Some(cleaned) = form.clean(&pool).await? else {
        return Ok(render_post_form(&pool, &user, &form, None)
            .await?
            .into_response());
    };

    let image = match &cleaned.image {
        Some(image) => Some(save_image(&config.media_root, image).await?),
        None => None,
    };

    let post_id = NewPost {
        text: cleaned.text,
        group_id: cleaned.group_id,
        image,
        author_id: user.id,
    }
    .insert(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::from(e)
    })?;

    cache.clear();
    tracing::info!(post_id, author = %user.username, "Post created");

    Ok(redirect("/"))
}

/// Single post with its comments, the author card and a blank comment form.
pub async fn post_view(
    State(pool): State<SqlitePool>,
    CurrentUser(viewer): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let post_id = parse_post_id(&post_id)?;
    let author = get_user_or_404(&pool, &username).await?;
    let post = PostView::find_for_author(&pool, author.id, post_id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let profile = ProfileCard::load(&pool, &author, viewer.as_ref().map(|u| u.id)).await?;
    let comments = CommentView::list_for_post(&pool, post.id).await?;

    templates::render(
        "post.html",
        context! {
            user => viewer,
            post => post,
            profile => profile,
            items => comments,
            form => CommentForm::default(),
        },
    )
}

/// Outcome of opening a post for editing.
enum EditAccess {
    Owner(PostView),
    /// Someone else's post: send them to its detail page.
    NotOwner(Response),
}

async fn editable_post(
    pool: &SqlitePool,
    user: &SessionUser,
    username: &str,
    raw_post_id: &str,
) -> Result<EditAccess, AppError> {
    let post_id = parse_post_id(raw_post_id)?;
    let author = get_user_or_404(pool, username).await?;
    let post = PostView::find_for_author(pool, author.id, post_id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != user.id {
        return Ok(EditAccess::NotOwner(redirect(&post_url(
            &post.author_username,
            post.id,
        ))));
    }
    Ok(EditAccess::Owner(post))
}

/// Pre-filled form for the post's author.
pub async fn edit_post_page(
    State(pool): State<SqlitePool>,
    RequireUser(user): RequireUser,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let post = match editable_post(&pool, &user, &username, &post_id).await? {
        EditAccess::Owner(post) => post,
        EditAccess::NotOwner(response) => return Ok(response),
    };

    let form = PostForm::from_post(&post);
    Ok(render_post_form(&pool, &user, &form, Some(&post))
        .await?
        .into_response())
}

/// Updates text, group and (if a new one was uploaded) image in place.
pub async fn update_post(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(cache): State<Arc<FragmentCache>>,
    RequireUser(user): RequireUser,
    Path((username, post_id)): Path<(String, String)>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<Response, AppError> {
    let post = match editable_post(&pool, &user, &username, &post_id).await? {
        EditAccess::Owner(post) => post,
        EditAccess::NotOwner(response) => return Ok(response),
    };

    let mut form = PostForm::from_multipart(multipart).await?;
    let Some(cleaned) = form.clean(&pool).await? else {
        return Ok(render_post_form(&pool, &user, &form, Some(&post))
            .await?
            .into_response());
    };

    let image = match &cleaned.image {
        Some(image) => Some(save_image(&config.media_root, image).await?),
        None => post.image.clone(),
    };

    Post::update(&pool, post.id, &cleaned.text, cleaned.group_id, image.as_deref()).await?;
    cache.clear();
    tracing::info!(post_id = post.id, "Post updated");

    Ok(redirect(&post_url(&post.author_username, post.id)))
}
