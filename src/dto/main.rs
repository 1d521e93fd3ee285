use serde::Serialize;

use crate::domain::client_survey::SurveyStats;
use crate::dto::surveys::SurveyRow;

/// Number of surveys listed on the dashboard overview.
pub const RECENT_SURVEYS: usize = 5;

/// Data required to render the dashboard overview.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    /// Greeting name of the signed-in builder.
    pub first_name: String,
    pub stats: SurveyStats,
    /// Latest surveys, newest first.
    pub recent: Vec<SurveyRow>,
    /// Public questionnaire link to share with clients.
    pub survey_link: String,
}
