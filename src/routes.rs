// src/routes.rs

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, comments, follow, groups, misc, posts, profile},
    state::AppState,
};

/// Upper bound for request bodies, image uploads included.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Static routes are registered alongside the `/{username}/...` ones;
///   static segments win, which is why those words are reserved usernames.
/// * Uploaded images are served from the media root under `/media`.
/// * Applies global middleware (Trace, panic -> 500 page).
pub fn create_router(state: AppState) -> Router {
    let media = ServeDir::new(&state.config.media_root);

    let auth_routes = Router::new()
        .route("/signup/", get(auth::signup_page).post(auth::signup))
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout));

    let admin_routes = Router::new().route(
        "/groups/",
        get(admin::groups_page).post(admin::create_group),
    );

    Router::new()
        .route("/", get(posts::index))
        .route("/group/{slug}/", get(groups::group_posts))
        .route("/new/", get(posts::new_post_page).post(posts::create_post))
        .route("/follow/", get(follow::follow_index))
        .route("/{username}/", get(profile::profile))
        .route(
            "/{username}/follow/",
            get(follow::profile_follow).post(follow::profile_follow),
        )
        .route(
            "/{username}/unfollow/",
            get(follow::profile_unfollow).post(follow::profile_unfollow),
        )
        .route("/{username}/{post_id}/", get(posts::post_view))
        .route(
            "/{username}/{post_id}/edit/",
            get(posts::edit_post_page).post(posts::update_post),
        )
        .route(
            "/{username}/{post_id}/comment/",
            get(comments::comment_page).post(comments::add_comment),
        )
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .nest_service("/media", media)
        .fallback(misc::page_not_found)
        // Global Middleware (applied from outside in)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(misc::server_error))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
