// src/utils/jwt.rs

use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, SESSION_COOKIE},
    error::AppError,
    handlers::redirect,
};

pub const LOGIN_URL: &str = "/auth/login/";

/// Characters left readable in the `next` parameter.
const NEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    pub username: String,
    /// User's role (e.g., 'user', 'admin').
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a session token for the user.
pub fn sign_jwt(
    id: i64,
    username: &str,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        username: username.to_owned(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a token. Expired or tampered tokens fail.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Forbidden("Invalid session".to_string()))?;

    Ok(token_data.claims)
}

/// The authenticated user of a request.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl TryFrom<Claims> for SessionUser {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(SessionUser {
            id: claims.sub.parse()?,
            username: claims.username,
            role: claims.role,
        })
    }
}

fn session_from_parts(parts: &Parts, config: &Config) -> Option<SessionUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE)?;
    let claims = verify_jwt(token.value(), &config.jwt_secret).ok()?;
    SessionUser::try_from(claims).ok()
}

/// `/auth/login/?next=<path>` for the request being rejected.
pub fn login_redirect_url(parts: &Parts) -> String {
    let next = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}?next={}", LOGIN_URL, utf8_percent_encode(next, NEXT_PARAM))
}

/// Extractor: the viewing user, if any. Bad or expired tokens count as anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        Ok(CurrentUser(session_from_parts(parts, &config)))
    }
}

/// Extractor for write routes: anonymous requests are redirected to the login
/// page with the original path as `next`.
#[derive(Debug, Clone)]
pub struct RequireUser(pub SessionUser);

impl<S> FromRequestParts<S> for RequireUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        match session_from_parts(parts, &config) {
            Some(user) => Ok(RequireUser(user)),
            None => Err(redirect(&login_redirect_url(parts))),
        }
    }
}

/// Extractor for administration pages. Logged-in non-admins get a 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

impl<S> FromRequestParts<S> for AdminUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(
                AppError::Forbidden("Administrators only.".to_string()).into_response(),
            );
        }
        Ok(AdminUser(user))
    }
}
