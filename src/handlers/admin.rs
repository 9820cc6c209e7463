// src/handlers/admin.rs

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use minijinja::context;
use sqlx::SqlitePool;

use super::redirect;
use crate::{
    error::AppError,
    forms::group::GroupForm,
    models::group::Group,
    templates,
    utils::jwt::{AdminUser, SessionUser},
};

async fn render_groups(
    pool: &SqlitePool,
    user: &SessionUser,
    form: &GroupForm,
) -> Result<Html<String>, AppError> {
    let groups = Group::list(pool).await?;
    templates::render(
        "admin/groups.html",
        context! { user => user, groups => groups, form => form },
    )
}

/// Lists all groups with a creation form.
/// Admin only.
pub async fn groups_page(
    State(pool): State<SqlitePool>,
    AdminUser(user): AdminUser,
) -> Result<Html<String>, AppError> {
    render_groups(&pool, &user, &GroupForm::default()).await
}

/// Creates a group.
/// Admin only. Duplicate slugs are reported on the form.
pub async fn create_group(
    State(pool): State<SqlitePool>,
    AdminUser(user): AdminUser,
    WithRejection(Form(mut form), _): WithRejection<Form<GroupForm>, AppError>,
) -> Result<Response, AppError> {
    if !form.is_valid() {
        return Ok(render_groups(&pool, &user, &form).await?.into_response());
    }

    let created = Group::create(&pool, form.title.trim(), &form.slug, form.description.trim()).await;
    match created {
        Ok(id) => {
            tracing::info!(group_id = id, slug = %form.slug, "Group created");
            Ok(redirect("/admin/groups/"))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            form.errors.add("slug", "Group with this slug already exists.");
            Ok(render_groups(&pool, &user, &form).await?.into_response())
        }
        Err(e) => {
            tracing::error!("Failed to create group: {:?}", e);
            Err(AppError::from(e))
        }
    }
}
