// src/templates.rs

use std::sync::LazyLock;

use axum::response::Html;
use chrono::DateTime;
use minijinja::{Environment, Value};

use crate::error::AppError;

/// Templates are compiled into the binary.
const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("group.html", include_str!("../templates/group.html")),
    ("profile.html", include_str!("../templates/profile.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("new_post.html", include_str!("../templates/new_post.html")),
    ("comments.html", include_str!("../templates/comments.html")),
    ("follow.html", include_str!("../templates/follow.html")),
    (
        "includes/post_item.html",
        include_str!("../templates/includes/post_item.html"),
    ),
    (
        "includes/paginator.html",
        include_str!("../templates/includes/paginator.html"),
    ),
    (
        "includes/index_page.html",
        include_str!("../templates/includes/index_page.html"),
    ),
    (
        "includes/profile_card.html",
        include_str!("../templates/includes/profile_card.html"),
    ),
    (
        "includes/field_errors.html",
        include_str!("../templates/includes/field_errors.html"),
    ),
    ("auth/login.html", include_str!("../templates/auth/login.html")),
    ("auth/signup.html", include_str!("../templates/auth/signup.html")),
    ("admin/groups.html", include_str!("../templates/admin/groups.html")),
    ("misc/404.html", include_str!("../templates/misc/404.html")),
    ("misc/500.html", include_str!("../templates/misc/500.html")),
    ("misc/error.html", include_str!("../templates/misc/error.html")),
];

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for &(name, source) in SOURCES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Failed to compile template {}: {:#}", name, e);
        }
    }
    env.add_filter("datetime", format_datetime);
    env
});

/// `{{ post.pub_date|datetime }}`: human readable form of an RFC 3339 timestamp.
fn format_datetime(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(dt) => dt.format("%-d %b %Y %H:%M").to_string(),
        Err(_) => value,
    }
}

pub fn render_string(name: &str, ctx: Value) -> Result<String, minijinja::Error> {
    TEMPLATES.get_template(name)?.render(ctx)
}

/// Renders a full page.
pub fn render(name: &str, ctx: Value) -> Result<Html<String>, AppError> {
    Ok(Html(render_string(name, ctx)?))
}
