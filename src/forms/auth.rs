// src/forms/auth.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{FormErrors, NON_FIELD_ERRORS};

/// Letters, digits and @/./+/-/_ only.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// First path segments owned by other routes; a user with one of these names
/// would have an unreachable profile.
const RESERVED_USERNAMES: &[&str] = &["admin", "auth", "follow", "group", "media", "new"];

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::new("invalid_username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ));
    }
    if RESERVED_USERNAMES.contains(&username.to_lowercase().as_str()) {
        return Err(ValidationError::new("reserved_username")
            .with_message("This username is not available.".into()));
    }
    Ok(())
}

/// Registration form.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 150, message = "Username must be between 1 and 150 characters."),
        custom(function = validate_username)
    )]
    pub username: String,

    #[serde(default, skip_serializing)]
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters."
    ))]
    pub password: String,

    #[serde(default, skip_serializing)]
    pub password_confirm: String,

    #[serde(skip_deserializing)]
    pub errors: FormErrors,
}

impl SignupForm {
    /// Field rules plus the password confirmation check.
    pub fn is_valid(&mut self) -> bool {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if self.password != self.password_confirm {
            errors.add("password_confirm", "The two password fields didn't match.");
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }
}

/// Login form. `next` is carried through from the login redirect.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    pub next: Option<String>,

    #[serde(skip_deserializing)]
    pub errors: FormErrors,
}

impl LoginForm {
    pub fn reject(&mut self) {
        self.errors.add(
            NON_FIELD_ERRORS,
            "Please enter a correct username and password.",
        );
    }
}

/// Only same-site paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}
