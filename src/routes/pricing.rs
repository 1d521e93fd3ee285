use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::forms::pricing::{PricingForm, PricingQuery};
use crate::routes::{base_context, reauthenticate, redirect, render_template};
use crate::services::{ServiceError, pricing as pricing_service};
use crate::session::AuthenticatedBuilder;

const PRICING_PATH: &str = "/dashboard/pricing-setup";

#[get("/dashboard/pricing-setup")]
pub async fn pricing(
    builder: AuthenticatedBuilder,
    query: web::Query<PricingQuery>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match pricing_service::load_pricing_page(api.get_ref(), &builder, query.edit).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&builder.user), "pricing");
            context.insert("pricing", &data);
            render_template(&tera, "dashboard/pricing.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(&session),
        Err(err) => {
            log::error!("Failed to load pricing: {err}");
            FlashMessage::error(format!("Error fetching pricing data: {err}")).send();
            redirect("/dashboard")
        }
    }
}

#[post("/dashboard/pricing-setup/add")]
pub async fn add_pricing(
    builder: AuthenticatedBuilder,
    session: Session,
    api: web::Data<HttpApiClient>,
    web::Form(form): web::Form<PricingForm>,
) -> impl Responder {
    match pricing_service::add_pricing_item(api.get_ref(), &builder, form).await {
        Ok(()) => {
            FlashMessage::success("Pricing item added successfully.").send();
        }
        Err(ServiceError::Unauthorized) => return reauthenticate(&session),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add pricing item: {err}");
            FlashMessage::error(format!("Error adding pricing: {err}")).send();
        }
    }
    redirect(PRICING_PATH)
}

#[post("/dashboard/pricing-setup/{item_id}/update")]
pub async fn update_pricing(
    builder: AuthenticatedBuilder,
    item_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    web::Form(form): web::Form<PricingForm>,
) -> impl Responder {
    let item_id = item_id.into_inner();
    match pricing_service::update_pricing_item(api.get_ref(), &builder, item_id, form).await {
        Ok(()) => {
            FlashMessage::success("Pricing item updated successfully.").send();
            redirect(PRICING_PATH)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(&session),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("{PRICING_PATH}?edit={item_id}"))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Pricing item not found.").send();
            redirect(PRICING_PATH)
        }
        Err(err) => {
            log::error!("Failed to update pricing item: {err}");
            FlashMessage::error(format!("Error updating pricing: {err}")).send();
            redirect(&format!("{PRICING_PATH}?edit={item_id}"))
        }
    }
}

#[post("/dashboard/pricing-setup/{item_id}/delete")]
pub async fn delete_pricing(
    builder: AuthenticatedBuilder,
    item_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match pricing_service::delete_pricing_item(api.get_ref(), &builder, item_id.into_inner()).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&builder.user), "pricing");
            context.insert("pricing", &data);
            render_template(&tera, "dashboard/pricing.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(&session),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Pricing item not found.").send();
            redirect(PRICING_PATH)
        }
        Err(err) => {
            log::error!("Failed to delete pricing item: {err}");
            FlashMessage::error(format!("Error deleting pricing: {err}")).send();
            redirect(PRICING_PATH)
        }
    }
}
