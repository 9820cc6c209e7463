// src/handlers/auth.rs

use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar, SameSite},
};
use minijinja::context;
use serde::Deserialize;
use sqlx::SqlitePool;

use super::redirect;
use crate::{
    config::{Config, SESSION_COOKIE},
    error::AppError,
    forms::auth::{LoginForm, SignupForm, safe_next},
    models::user::User,
    templates,
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

#[derive(Debug, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Signs a session token and attaches it to the jar.
fn start_session(jar: CookieJar, user: &User, config: &Config) -> Result<CookieJar, AppError> {
    let token = sign_jwt(
        user.id,
        &user.username,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;
    Ok(jar.add(session_cookie(token)))
}

pub async fn signup_page() -> Result<Html<String>, AppError> {
    templates::render("auth/signup.html", context! { form => SignupForm::default() })
}

/// Registers a new user, logs them in and sends them to the index.
///
/// Hashes the password using Argon2 before storing it.
pub async fn signup(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    jar: CookieJar,
    WithRejection(Form(mut form), _): WithRejection<Form<SignupForm>, AppError>,
) -> Result<Response, AppError> {
    if !form.is_valid() {
        return Ok(templates::render("auth/signup.html", context! { form => form })?.into_response());
    }

    let hashed_password = hash_password(&form.password)?;

    let created = User::create(&pool, &form.username, &hashed_password, "user").await;
    let user = match created {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            form.errors
                .add("username", "A user with that username already exists.");
            return Ok(
                templates::render("auth/signup.html", context! { form => form })?.into_response(),
            );
        }
        Err(e) => {
            tracing::error!("Failed to register user: {:?}", e);
            return Err(AppError::from(e));
        }
    };
    tracing::info!(username = %user.username, "User registered");

    let jar = start_session(jar, &user, &config)?;
    Ok((jar, redirect("/")).into_response())
}

pub async fn login_page(
    WithRejection(Query(params), _): WithRejection<Query<NextParams>, AppError>,
) -> Result<Html<String>, AppError> {
    let form = LoginForm {
        next: params.next,
        ..LoginForm::default()
    };
    templates::render("auth/login.html", context! { form => form })
}

/// Verifies the credentials, sets the session cookie and follows `next`.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    jar: CookieJar,
    WithRejection(Form(mut form), _): WithRejection<Form<LoginForm>, AppError>,
) -> Result<Response, AppError> {
    let user = User::find_by_username(&pool, &form.username)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::from(e)
        })?;

    let authenticated = match &user {
        Some(user) => verify_password(&form.password, &user.password)?,
        None => false,
    };

    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            form.reject();
            return Ok(
                templates::render("auth/login.html", context! { form => form })?.into_response(),
            );
        }
    };

    let jar = start_session(jar, &user, &config)?;
    let next = safe_next(form.next.as_deref());
    Ok((jar, redirect(next)).into_response())
}

pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, redirect("/")).into_response()
}
