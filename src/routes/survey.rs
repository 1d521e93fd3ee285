use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::{Context, Tera};

use crate::api::HttpApiClient;
use crate::domain::survey::SurveyDraft;
use crate::dto::Alert;
use crate::dto::survey::SurveyPageData;
use crate::forms::survey::{BuilderQuery, SurveyForm};
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::survey::{self as survey_service, SurveyOutcome};
use crate::stash::MemoryPhotoStash;

fn render_survey(
    tera: &Tera,
    mut context: Context,
    page: &SurveyPageData,
    alert: Option<&Alert>,
) -> actix_web::HttpResponse {
    context.insert("survey", page);
    context.insert("alert", &alert);
    render_template(tera, "survey/index.html", &context)
}

fn render_invalid_link(tera: &Tera, context: &Context) -> actix_web::HttpResponse {
    render_template(tera, "survey/invalid_link.html", context)
}

#[get("/client-survey")]
pub async fn survey_page(
    query: web::Query<BuilderQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "survey");
    match survey_service::load_survey_page(query.builder_id()) {
        Ok(page) => render_survey(&tera, context, &page, None),
        Err(_) => render_invalid_link(&tera, &context),
    }
}

#[post("/client-survey")]
pub async fn submit_survey(
    query: web::Query<BuilderQuery>,
    api: web::Data<HttpApiClient>,
    stash: web::Data<MemoryPhotoStash>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<SurveyForm>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "survey");
    let Some(builder_id) = query.builder_id() else {
        return render_invalid_link(&tera, &context);
    };

    let post = form.into_post();
    match survey_service::handle_survey_post(
        api.get_ref(),
        stash.get_ref(),
        Some(builder_id),
        post,
    )
    .await
    {
        Ok(SurveyOutcome::Submitted) => redirect("/thank-you"),
        Ok(SurveyOutcome::Form { page, alert }) => {
            render_survey(&tera, context, &page, alert.as_ref())
        }
        Err(ServiceError::NotFound) => render_invalid_link(&tera, &context),
        Err(err) => {
            log::error!("Failed to handle survey for builder {builder_id}: {err}");
            let page = SurveyPageData::new(builder_id, &SurveyDraft::new());
            render_survey(&tera, context, &page, Some(&Alert::error(err.to_string())))
        }
    }
}

#[get("/thank-you")]
pub async fn thank_you(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "survey");
    render_template(&tera, "survey/thank_you.html", &context)
}

