// src/error.rs

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use std::fmt;

use crate::templates;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to rendered error pages.
///
/// Form validation problems are not errors: handlers re-render the form with
/// its field errors instead.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (e.g., a malformed multipart body)
    BadRequest(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

/// Renders an error page, falling back to plain text if the template itself fails.
pub fn error_page(status: StatusCode, template: &str, ctx: minijinja::Value) -> Response {
    match templates::render_string(template, ctx) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {}", template, e);
            let reason = status.canonical_reason().unwrap_or("Error");
            (status, reason.to_string()).into_response()
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// 404 and 500 get their dedicated templates, everything else the generic one.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                error_page(status, "misc/500.html", context! {})
            }
            AppError::NotFound(msg) => {
                error_page(status, "misc/404.html", context! { message => msg })
            }
            AppError::BadRequest(msg) | AppError::Forbidden(msg) => {
                error_page(
                    status,
                    "misc/error.html",
                    context! { status => status.as_u16(), message => msg },
                )
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::InternalServerError(format!("template error: {:#}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

// Extractor rejections, taken through `WithRejection` so that a malformed
// body or query string still gets an HTML error page.

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
