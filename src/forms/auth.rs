//! Forms of the sign-in, sign-up and password pages.

use serde::Deserialize;
use validator::Validate;

use crate::api::{LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::domain::types::Email;
use crate::domain::user::DEFAULT_ROLE_ID;
use crate::forms::{FormError, MIN_PASSWORD_LENGTH};

/// Tabs of the sign-in page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
    Forgot,
}

impl AuthTab {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthTab::Login => "login",
            AuthTab::Signup => "signup",
            AuthTab::Forgot => "forgot",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthPageQuery {
    #[serde(default)]
    pub tab: Option<String>,
}

impl AuthPageQuery {
    /// Unknown tabs fall back to the login form.
    pub fn tab(&self) -> AuthTab {
        match self.tab.as_deref() {
            Some("signup") => AuthTab::Signup,
            Some("forgot") => AuthTab::Forgot,
            _ => AuthTab::Login,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for LoginRequest {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterRequest {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        let name = ammonia::clean(form.name.trim());
        if name.is_empty() {
            return Err(FormError::InvalidName);
        }
        if form.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }
        Ok(Self {
            name,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
            role_id: DEFAULT_ROLE_ID,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for Email {
    type Error = FormError;

    fn try_from(form: ForgotPasswordForm) -> Result<Self, Self::Error> {
        Email::new(form.email).map_err(|_| FormError::InvalidEmail)
    }
}

/// Query string of the emailed reset link.
#[derive(Debug, Deserialize)]
pub struct ResetLinkQuery {
    pub token: Option<String>,
    pub email: Option<String>,
}

impl ResetLinkQuery {
    /// Token and email, when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        Some((token, email))
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl TryFrom<ResetPasswordForm> for ResetPasswordRequest {
    type Error = FormError;

    fn try_from(form: ResetPasswordForm) -> Result<Self, Self::Error> {
        if form.password != form.password_confirmation {
            return Err(FormError::PasswordMismatch);
        }
        if form.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }
        Ok(Self {
            token: form.token.trim().to_string(),
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            password: form.password,
            password_confirmation: form.password_confirmation,
        })
    }
}
