//! Form definitions backing the directory routes.
//!
//! Every form has exactly one validation contract, expressed with
//! `validator` derives. A form that fails validation never reaches the
//! hosted backend.

use chrono::{Datelike, Utc};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::domain::types::TypeConstraintError;

pub mod contact;
pub mod filters;
pub mod quote;
pub mod review;
pub mod supplier;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid category")]
    InvalidCategory,

    #[error("invalid rating")]
    InvalidRating,

    #[error("invalid name")]
    InvalidName,

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),
}

impl FormError {
    /// Per-field messages suitable for showing next to the inputs, sorted by
    /// field name. Non-validation errors are reported under `"form"`.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        match self {
            FormError::Validation(errors) => {
                let mut messages: Vec<(String, String)> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |error| {
                            let message = error
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
                            (field.to_string(), message)
                        })
                    })
                    .collect();
                messages.sort();
                messages
            }
            other => vec![("form".to_string(), other.to_string())],
        }
    }
}

/// Trims and drops blank optional text inputs.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts digits, spaces and `-+()` only.
pub(crate) fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')');
    if trimmed.chars().all(allowed) && trimmed.chars().any(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Please enter a valid phone number".into()))
    }
}

pub(crate) fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    uuid::Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid").with_message("Please select a category".into()))
}

pub(crate) fn validate_founded_year(year: i32) -> Result<(), ValidationError> {
    let current = Utc::now().year();
    if (1800..=current).contains(&year) {
        Ok(())
    } else {
        Err(ValidationError::new("founded_year")
            .with_message(format!("Year must be between 1800 and {current}").into()))
    }
}
