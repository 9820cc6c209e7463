use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FormErrors, not_blank};

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Group creation form used by administrators.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct GroupForm {
    #[serde(default)]
    #[validate(
        custom(function = not_blank),
        length(max = 200, message = "Title must be at most 200 characters.")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(regex(
        path = *SLUG_RE,
        message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
    ))]
    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(skip_deserializing)]
    pub errors: FormErrors,
}

impl GroupForm {
    pub fn is_valid(&mut self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                self.errors = FormErrors::from(e);
                false
            }
        }
    }
}
