use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::HttpApiClient;
use crate::dto::surveys::{SurveyDetailData, SurveysPageData};
use crate::forms::surveys::{DeleteSurveyForm, StatusUpdateForm, SurveyListQuery};
use crate::routes::{base_context, reauthenticate, redirect, render_template};
use crate::services::{ServiceError, ServiceResult, surveys as surveys_service};
use crate::session::AuthenticatedBuilder;

const SURVEYS_PATH: &str = "/dashboard/client-survey";

fn render_list(
    result: ServiceResult<SurveysPageData>,
    builder: &AuthenticatedBuilder,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match result {
        Ok(data) => {
            let mut context = base_context(flash_messages, Some(&builder.user), "surveys");
            context.insert("listing", &data);
            render_template(tera, "dashboard/surveys.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(session),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(SURVEYS_PATH)
        }
        Err(err) => {
            log::error!("Failed to render surveys: {err}");
            FlashMessage::error(format!("Error loading surveys: {err}")).send();
            redirect("/")
        }
    }
}

fn render_detail(
    result: ServiceResult<SurveyDetailData>,
    builder: &AuthenticatedBuilder,
    session: &Session,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match result {
        Ok(data) => {
            let mut context = base_context(flash_messages, Some(&builder.user), "surveys");
            context.insert("survey", &data);
            render_template(tera, "dashboard/survey_detail.html", &context)
        }
        Err(ServiceError::Unauthorized) => reauthenticate(session),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Survey not found.").send();
            redirect(SURVEYS_PATH)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(SURVEYS_PATH)
        }
        Err(err) => {
            log::error!("Failed to render survey detail: {err}");
            FlashMessage::error(format!("Error loading survey details: {err}")).send();
            redirect(SURVEYS_PATH)
        }
    }
}

#[get("/dashboard/client-survey")]
pub async fn surveys(
    builder: AuthenticatedBuilder,
    query: web::Query<SurveyListQuery>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = surveys_service::load_surveys_page(api.get_ref(), &builder, &query).await;
    render_list(result, &builder, &session, &flash_messages, &tera)
}

#[post("/dashboard/client-survey/{survey_id}/status")]
pub async fn update_status(
    builder: AuthenticatedBuilder,
    survey_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<StatusUpdateForm>,
) -> impl Responder {
    let result = surveys_service::update_survey_status(
        api.get_ref(),
        &builder,
        survey_id.into_inner(),
        &form,
    )
    .await;
    render_list(result, &builder, &session, &flash_messages, &tera)
}

#[post("/dashboard/client-survey/{survey_id}/delete")]
pub async fn delete_survey(
    builder: AuthenticatedBuilder,
    survey_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<DeleteSurveyForm>,
) -> impl Responder {
    let result =
        surveys_service::delete_survey(api.get_ref(), &builder, survey_id.into_inner(), &form)
            .await;
    render_list(result, &builder, &session, &flash_messages, &tera)
}

#[get("/dashboard/survey-detail/{survey_id}")]
pub async fn survey_detail(
    builder: AuthenticatedBuilder,
    survey_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result =
        surveys_service::load_survey_detail(api.get_ref(), &builder, survey_id.into_inner()).await;
    render_detail(result, &builder, &session, &flash_messages, &tera)
}

#[post("/dashboard/survey-detail/{survey_id}/status")]
pub async fn update_detail_status(
    builder: AuthenticatedBuilder,
    survey_id: web::Path<i64>,
    session: Session,
    api: web::Data<HttpApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<StatusUpdateForm>,
) -> impl Responder {
    let result = surveys_service::update_detail_status(
        api.get_ref(),
        &builder,
        survey_id.into_inner(),
        &form,
    )
    .await;
    render_detail(result, &builder, &session, &flash_messages, &tera)
}
