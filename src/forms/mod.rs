//! Form definitions backing the back-office routes.
//!
//! Forms deserialize raw operator input and convert it into domain values
//! through `TryFrom`, returning [`FormError`] with a message fit for a flash
//! alert.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod admins;
pub mod astrologers;
pub mod auth;
pub mod navigation;
pub mod puja;
pub mod reports;
pub mod slots;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Please check the form: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Name cannot be empty")]
    InvalidName,

    #[error("Invalid identifier")]
    InvalidId,

    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error("Invalid time, expected H:MMAM or H:MMPM")]
    InvalidTime,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Invalid phone number")]
    InvalidPhoneNumber,

    #[error("Invalid {0} number")]
    InvalidDocument(&'static str),

    #[error("{0}")]
    Invalid(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidUrl => FormError::InvalidUrl,
            TypeConstraintError::PasswordTooShort => FormError::PasswordTooShort,
            TypeConstraintError::InvalidTime(_) => FormError::InvalidTime,
            TypeConstraintError::InvalidDocument(label) => FormError::InvalidDocument(label),
            TypeConstraintError::InvalidValue(message) => FormError::Invalid(message),
        }
    }
}

/// Parses an HTML `date` input value.
pub(crate) fn parse_form_date(raw: &str) -> Result<chrono::NaiveDate, FormError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Trims an optional text input, mapping blanks to `None`.
pub(crate) fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
