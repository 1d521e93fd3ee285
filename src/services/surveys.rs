//! Survey management: the list, inline status changes, deletion and detail.

use crate::api::{SurveyReader, SurveyWriter};
use crate::domain::client_survey::SurveyListing;
use crate::domain::types::SurveyId;
use crate::dto::Alert;
use crate::dto::surveys::{SurveyDetailData, SurveysPageData};
use crate::forms::surveys::{DeleteSurveyForm, StatusUpdateForm, SurveyListQuery};
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedBuilder;

async fn fetch_listing<A>(api: &A, builder: &AuthenticatedBuilder) -> ServiceResult<SurveyListing>
where
    A: SurveyReader + ?Sized,
{
    let surveys = api.list_surveys(&builder.token).await.map_err(|err| {
        log::error!("Failed to load surveys: {err}");
        ServiceError::from(err)
    })?;
    Ok(SurveyListing::new(surveys))
}

fn page_data(listing: &SurveyListing, query: &SurveyListQuery) -> SurveysPageData {
    let filtered = listing.filtered(query.search(), query.filter());
    SurveysPageData::new(&filtered, listing.stats(), query.search(), query.filter())
}

/// Loads the survey list with search and status filter applied.
pub async fn load_surveys_page<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    query: &SurveyListQuery,
) -> ServiceResult<SurveysPageData>
where
    A: SurveyReader + ?Sized,
{
    let listing = fetch_listing(api, builder).await?;
    Ok(page_data(&listing, query))
}

/// Changes the status of one survey and renders the list.
///
/// The fetched listing only reflects the new status when the backend
/// accepted the change.
pub async fn update_survey_status<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    survey_id: i64,
    form: &StatusUpdateForm,
) -> ServiceResult<SurveysPageData>
where
    A: SurveyReader + SurveyWriter + ?Sized,
{
    let id = SurveyId::new(survey_id)?;
    let status = form.status()?;
    let query = form.list_query();
    let mut listing = fetch_listing(api, builder).await?;

    let alert = match api.update_survey_status(&builder.token, id, status).await {
        Ok(()) => {
            listing.apply_status(id, status);
            Alert::success("Status updated successfully!")
        }
        Err(err) if err.is_unauthorized() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to update status of survey {id}: {err}");
            Alert::error(format!("Error updating status: {err}"))
        }
    };

    Ok(page_data(&listing, &query).with_alert(alert))
}

/// Deletes one survey and renders the list without it.
pub async fn delete_survey<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    survey_id: i64,
    form: &DeleteSurveyForm,
) -> ServiceResult<SurveysPageData>
where
    A: SurveyReader + SurveyWriter + ?Sized,
{
    let id = SurveyId::new(survey_id)?;
    let query = form.list_query();
    let mut listing = fetch_listing(api, builder).await?;

    let alert = match api.delete_survey(&builder.token, id).await {
        Ok(()) => {
            listing.remove(id);
            Alert::success("Survey deleted successfully!")
        }
        Err(err) if err.is_unauthorized() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to delete survey {id}: {err}");
            Alert::error(format!("Error deleting survey: {err}"))
        }
    };

    Ok(page_data(&listing, &query).with_alert(alert))
}

/// Loads one survey in full.
pub async fn load_survey_detail<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    survey_id: i64,
) -> ServiceResult<SurveyDetailData>
where
    A: SurveyReader + ?Sized,
{
    let id = SurveyId::new(survey_id).map_err(|_| ServiceError::NotFound)?;
    let survey = api.get_survey(&builder.token, id).await.map_err(|err| {
        log::error!("Failed to load survey {id}: {err}");
        ServiceError::from(err)
    })?;
    Ok(SurveyDetailData::from(&survey))
}

/// Changes the status from the detail page and renders it again.
pub async fn update_detail_status<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    survey_id: i64,
    form: &StatusUpdateForm,
) -> ServiceResult<SurveyDetailData>
where
    A: SurveyReader + SurveyWriter + ?Sized,
{
    let id = SurveyId::new(survey_id).map_err(|_| ServiceError::NotFound)?;
    let status = form.status()?;
    let mut survey = api.get_survey(&builder.token, id).await.map_err(|err| {
        log::error!("Failed to load survey {id}: {err}");
        ServiceError::from(err)
    })?;

    let alert = match api.update_survey_status(&builder.token, id, status).await {
        Ok(()) => {
            survey.status = status.into();
            Alert::success("Status updated successfully!")
        }
        Err(err) if err.is_unauthorized() => return Err(ServiceError::Unauthorized),
        Err(err) => {
            log::error!("Failed to update status of survey {id}: {err}");
            Alert::error(format!("Error updating status: {err}"))
        }
    };

    let mut data = SurveyDetailData::from(&survey);
    data.alert = Some(alert);
    Ok(data)
}
