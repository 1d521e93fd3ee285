//! Sign-in, sign-up, verification and password recovery.

use crate::api::{ApiError, AuthApi, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::domain::types::Email;
use crate::domain::user::User;
use crate::forms::auth::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use crate::services::{ServiceError, ServiceResult};
use crate::session::{AuthSession, SessionError, SessionStore};

/// Keeps the backend's explanation (bad credentials, taken email) so it can
/// be shown next to the form.
fn rejection_as_form(err: ApiError) -> ServiceError {
    match err {
        ApiError::Rejected { message, .. } => ServiceError::Form(message),
        err => ServiceError::from(err),
    }
}

fn session_rejection_as_form(err: SessionError) -> ServiceError {
    match err {
        SessionError::Api(err) => rejection_as_form(err),
        err => ServiceError::from(err),
    }
}

/// Signs the builder in.
///
/// Returns [`ServiceError::EmailNotVerified`] when the account still needs
/// verification; the session then keeps the token so the link can be resent.
pub async fn login<S, A>(store: &S, api: &A, form: LoginForm) -> ServiceResult<User>
where
    S: SessionStore,
    A: AuthApi + ?Sized,
{
    let request = LoginRequest::try_from(form)?;
    let session = AuthSession::login(store, api, &request)
        .await
        .map_err(|err| {
            log::warn!("Login failed for {}: {err}", request.email);
            session_rejection_as_form(err)
        })?;

    session
        .user()
        .cloned()
        .ok_or(ServiceError::EmailNotVerified)
}

/// Creates an account. Returns the user when it can be used right away,
/// `None` when the email must be verified first.
pub async fn register<S, A>(store: &S, api: &A, form: RegisterForm) -> ServiceResult<Option<User>>
where
    S: SessionStore,
    A: AuthApi + ?Sized,
{
    let request = RegisterRequest::try_from(form)?;
    let session = AuthSession::register(store, api, &request)
        .await
        .map_err(|err| {
            log::error!("Registration failed: {err}");
            session_rejection_as_form(err)
        })?;
    Ok(session.user().cloned())
}

pub async fn logout<S, A>(store: &S, api: &A)
where
    S: SessionStore,
    A: AuthApi + ?Sized,
{
    AuthSession::logout(store, api).await;
}

/// Asks the backend to send a new verification link using the stored token.
pub async fn resend_verification<S, A>(store: &S, api: &A) -> ServiceResult<String>
where
    S: SessionStore,
    A: AuthApi + ?Sized,
{
    let session = AuthSession::load(store);
    let Some(token) = session.token() else {
        return Err(ServiceError::Unauthorized);
    };
    api.resend_verification(token).await.map_err(|err| {
        log::error!("Failed to resend verification email: {err}");
        ServiceError::from(err)
    })
}

pub async fn forgot_password<A>(api: &A, form: ForgotPasswordForm) -> ServiceResult<String>
where
    A: AuthApi + ?Sized,
{
    let email = Email::try_from(form)?;
    api.forgot_password(&email).await.map_err(|err| {
        log::error!("Failed to request a password reset: {err}");
        rejection_as_form(err)
    })
}

pub async fn reset_password<A>(api: &A, form: ResetPasswordForm) -> ServiceResult<String>
where
    A: AuthApi + ?Sized,
{
    let request = ResetPasswordRequest::try_from(form)?;
    api.reset_password(&request).await.map_err(|err| {
        log::error!("Failed to reset password: {err}");
        rejection_as_form(err)
    })
}
