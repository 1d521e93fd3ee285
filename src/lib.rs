use actix_cors::Cors;
use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::routes::account::{account_settings, save_account_settings};
use crate::routes::auth::{
    auth_page, forgot_password, login, password_reset_page, register, resend_verification,
    reset_password,
};
use crate::routes::main::{dashboard, home, logout};
use crate::routes::pricing::{add_pricing, delete_pricing, pricing, update_pricing};
use crate::routes::survey::{submit_survey, survey_page, thank_you};
use crate::routes::surveys::{
    delete_survey, survey_detail, surveys, update_detail_status, update_status,
};
use crate::stash::MemoryPhotoStash;

pub mod api;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod stash;

/// Upper bound of one multipart request: ten 5MB photos plus the text fields.
pub const MULTIPART_TOTAL_LIMIT: usize = 64 * 1024 * 1024;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let api = HttpApiClient::new(&server_config.api_base_url, server_config.api_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build the API client: {e}")))?;

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let photo_stash = web::Data::new(MemoryPhotoStash::default());

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting EstiMate Pro on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.api_base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(home)
            .service(survey_page)
            .service(submit_survey)
            .service(thank_you)
            .service(auth_page)
            .service(login)
            .service(register)
            .service(resend_verification)
            .service(forgot_password)
            .service(password_reset_page)
            .service(reset_password)
            .service(logout)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(dashboard)
                    .service(surveys)
                    .service(update_status)
                    .service(delete_survey)
                    .service(survey_detail)
                    .service(update_detail_status)
                    .service(pricing)
                    .service(add_pricing)
                    .service(update_pricing)
                    .service(delete_pricing)
                    .service(account_settings)
                    .service(save_account_settings),
            )
            .app_data(MultipartFormConfig::default().total_limit(MULTIPART_TOTAL_LIMIT))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(api.clone()))
            .app_data(photo_stash.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
