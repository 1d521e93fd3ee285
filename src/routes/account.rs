use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::forms::account::ProfileForm;
use crate::routes::{base_context, reauthenticate, redirect, render_template};
use crate::services::{ServiceError, account as account_service};
use crate::session::AuthenticatedBuilder;

const ACCOUNT_PATH: &str = "/dashboard/account-settings";

#[get("/dashboard/account-settings")]
pub async fn account_settings(
    builder: AuthenticatedBuilder,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match account_service::load_account(api.get_ref(), &builder).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&builder.user), "account");
            context.insert("account", &data);
            render_template(&tera, "dashboard/account.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(&session),
        Err(err) => {
            log::error!("Failed to load account settings: {err}");
            FlashMessage::error(format!("Error fetching profile: {err}")).send();
            redirect("/dashboard")
        }
    }
}

#[post("/dashboard/account-settings")]
pub async fn save_account_settings(
    builder: AuthenticatedBuilder,
    session: Session,
    api: web::Data<HttpApiClient>,
    MultipartForm(form): MultipartForm<ProfileForm>,
) -> impl Responder {
    match account_service::update_account(api.get_ref(), &builder, form).await {
        Ok(()) => {
            FlashMessage::success("Profile updated successfully!").send();
        }
        Err(ServiceError::Unauthorized) => return reauthenticate(&session),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            FlashMessage::error(format!("Error updating profile: {err}")).send();
        }
    }
    redirect(ACCOUNT_PATH)
}
