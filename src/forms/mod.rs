//! Form definitions backing the frontend routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod account;
pub mod auth;
pub mod pricing;
pub mod survey;
pub mod surveys;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter your name.")]
    InvalidName,

    #[error("Please make sure both password fields match.")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,

    #[error("{0} must be a number.")]
    InvalidNumber(&'static str),

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    Upload(String),
}

/// Minimum password length accepted by sign up and password reset.
pub const MIN_PASSWORD_LENGTH: usize = 6;
