use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{FormErrors, not_blank};

/// Comment submission, posted as `application/x-www-form-urlencoded`.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = not_blank))]
    pub text: String,

    #[serde(skip_deserializing)]
    pub errors: FormErrors,
}

impl CommentForm {
    /// Trimmed text if the form is valid; otherwise the errors are kept on the form.
    pub fn clean(&mut self) -> Option<String> {
        match self.validate() {
            Ok(()) => Some(self.text.trim().to_string()),
            Err(e) => {
                self.errors = FormErrors::from(e);
                None
            }
        }
    }
}
