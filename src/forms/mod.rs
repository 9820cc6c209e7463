// src/forms/mod.rs

pub mod auth;
pub mod comment;
pub mod group;
pub mod post;

use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// Key under which errors that belong to no single field are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";

/// Field name -> messages, rendered next to each input when a form is
/// redisplayed.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(&field, message);
            }
        }
        form_errors
    }
}

/// Required text: whitespace alone does not count.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_blank_rejects_whitespace() {
        assert!(not_blank("   \n").is_err());
        assert!(not_blank(" hi ").is_ok());
    }

    #[test]
    fn errors_accumulate_per_field() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());
        errors.add("text", "one");
        errors.add("text", "two");
        assert_eq!(errors.get("text"), ["one", "two"]);
        assert!(errors.get("image").is_empty());
    }
}
