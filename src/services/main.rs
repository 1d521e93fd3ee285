use crate::api::SurveyReader;
use crate::domain::client_survey::SurveyListing;
use crate::dto::main::{DashboardPageData, RECENT_SURVEYS};
use crate::dto::surveys::SurveyRow;
use crate::services::{ServiceError, ServiceResult};
use crate::session::AuthenticatedBuilder;

/// Shareable link of the public questionnaire for a builder.
pub fn survey_link(public_url: &str, builder: &AuthenticatedBuilder) -> String {
    format!(
        "{}/client-survey?builder={}",
        public_url.trim_end_matches('/'),
        builder.user.builder_id()
    )
}

/// Loads the lead counters and most recent surveys for the dashboard.
pub async fn load_dashboard<A>(
    api: &A,
    builder: &AuthenticatedBuilder,
    public_url: &str,
) -> ServiceResult<DashboardPageData>
where
    A: SurveyReader + ?Sized,
{
    let surveys = api.list_surveys(&builder.token).await.map_err(|err| {
        log::error!("Failed to load dashboard data: {err}");
        ServiceError::from(err)
    })?;
    let listing = SurveyListing::new(surveys);

    Ok(DashboardPageData {
        first_name: builder.user.first_name().to_string(),
        stats: listing.stats(),
        recent: listing
            .recent(RECENT_SURVEYS)
            .into_iter()
            .map(SurveyRow::from)
            .collect(),
        survey_link: survey_link(public_url, builder),
    })
}
