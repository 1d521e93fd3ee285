use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, reauthenticate, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service, main as main_service};
use crate::session::{AuthSession, AuthenticatedBuilder};

#[get("/")]
pub async fn home(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let auth = AuthSession::load(&session);
    let context = base_context(&flash_messages, auth.user(), "home");
    render_template(&tera, "main/index.html", &context)
}

#[get("/dashboard")]
pub async fn dashboard(
    builder: AuthenticatedBuilder,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_dashboard(api.get_ref(), &builder, &server_config.public_url).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&builder.user), "dashboard");
            context.insert("dashboard", &data);
            render_template(&tera, "dashboard/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(&session),
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            let mut context = base_context(&flash_messages, Some(&builder.user), "dashboard");
            context.insert("load_error", &format!("Error fetching dashboard data: {err}"));
            render_template(&tera, "dashboard/index.html", &context)
        }
    }
}

#[post("/logout")]
pub async fn logout(session: Session, api: web::Data<HttpApiClient>) -> impl Responder {
    auth_service::logout(&session, api.get_ref()).await;
    FlashMessage::info("You have been logged out.").send();
    redirect("/")
}
