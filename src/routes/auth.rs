use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::forms::auth::{
    AuthPageQuery, ForgotPasswordForm, LoginForm, RegisterForm, ResetLinkQuery, ResetPasswordForm,
};
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};
use crate::session::AuthSession;

#[get("/auth")]
pub async fn auth_page(
    query: web::Query<AuthPageQuery>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let auth = AuthSession::load(&session);
    if auth.is_authenticated() {
        return redirect("/dashboard");
    }

    let mut context = base_context(&flash_messages, None, "auth");
    context.insert("tab", query.tab().as_str());
    // A token without a verified account means verification is pending.
    context.insert("can_resend", &auth.token().is_some());
    render_template(&tera, "auth/index.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    session: Session,
    api: web::Data<HttpApiClient>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth_service::login(&session, api.get_ref(), form).await {
        Ok(_) => {
            FlashMessage::success("Successfully logged in.").send();
            redirect("/dashboard")
        }
        Err(ServiceError::EmailNotVerified) => {
            FlashMessage::warning(
                "Please verify your email before logging in. You can request a new verification link below.",
            )
            .send();
            redirect("/auth")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Error logging in: {message}")).send();
            redirect("/auth")
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error(format!("Error logging in: {err}")).send();
            redirect("/auth")
        }
    }
}

#[post("/auth/register")]
pub async fn register(
    session: Session,
    api: web::Data<HttpApiClient>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match auth_service::register(&session, api.get_ref(), form).await {
        Ok(Some(_)) => {
            FlashMessage::success("Your account has been created.").send();
            redirect("/dashboard")
        }
        Ok(None) => {
            FlashMessage::success(
                "Registration successful! Please check your email for verification.",
            )
            .send();
            redirect("/auth")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(format!("Error signing up: {message}")).send();
            redirect("/auth?tab=signup")
        }
        Err(err) => {
            log::error!("Failed to register: {err}");
            FlashMessage::error(format!("Error signing up: {err}")).send();
            redirect("/auth?tab=signup")
        }
    }
}

#[post("/auth/resend-verification")]
pub async fn resend_verification(session: Session, api: web::Data<HttpApiClient>) -> impl Responder {
    match auth_service::resend_verification(&session, api.get_ref()).await {
        Ok(_) => {
            FlashMessage::success(
                "Verification email sent! Please check your email for the verification link.",
            )
            .send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Please log in first to resend the verification email.").send();
        }
        Err(err) => {
            log::error!("Failed to resend verification: {err}");
            FlashMessage::error("Failed to send verification email. Please try again.").send();
        }
    }
    redirect("/auth")
}

#[post("/auth/forgot-password")]
pub async fn forgot_password(
    api: web::Data<HttpApiClient>,
    web::Form(form): web::Form<ForgotPasswordForm>,
) -> impl Responder {
    match auth_service::forgot_password(api.get_ref(), form).await {
        Ok(_) => {
            FlashMessage::success(
                "Password reset email sent! Please check your email for the password reset link.",
            )
            .send();
            redirect("/auth")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth?tab=forgot")
        }
        Err(err) => {
            log::error!("Failed to request password reset: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect("/auth?tab=forgot")
        }
    }
}

#[get("/password-reset")]
pub async fn password_reset_page(
    query: web::Query<ResetLinkQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some((token, email)) = query.credentials() else {
        FlashMessage::error("Invalid reset link. Please request a new password reset.").send();
        return redirect("/auth?tab=forgot");
    };

    let mut context = base_context(&flash_messages, None, "auth");
    context.insert("token", token);
    context.insert("email", email);
    render_template(&tera, "auth/password_reset.html", &context)
}

#[post("/password-reset")]
pub async fn reset_password(
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ResetPasswordForm>,
) -> impl Responder {
    let token = form.token.clone();
    let email = form.email.clone();

    let message = match auth_service::reset_password(api.get_ref(), form).await {
        Ok(_) => {
            FlashMessage::success(
                "Password reset successful! You can now log in with your new password.",
            )
            .send();
            return redirect("/auth?tab=login");
        }
        Err(ServiceError::Form(message)) => message,
        Err(err) => {
            log::error!("Failed to reset password: {err}");
            err.to_string()
        }
    };

    let mut context = base_context(&flash_messages, None, "auth");
    context.insert("token", &token);
    context.insert("email", &email);
    context.insert("error", &format!("Error resetting password: {message}"));
    render_template(&tera, "auth/password_reset.html", &context)
}
