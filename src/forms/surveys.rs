//! Forms and query strings of the survey management pages.

use serde::Deserialize;

use crate::domain::client_survey::{StatusFilter, SurveyStatus};
use crate::forms::FormError;

/// Search and status filter of the survey list.
#[derive(Debug, Default, Deserialize)]
pub struct SurveyListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

impl SurveyListQuery {
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }

    /// Unknown status values fall back to showing everything.
    pub fn filter(&self) -> StatusFilter {
        self.status
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateForm {
    pub status: String,
    /// List filters to keep when the page is re-rendered.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

impl StatusUpdateForm {
    pub fn status(&self) -> Result<SurveyStatus, FormError> {
        self.status.parse().map_err(FormError::from)
    }

    pub fn list_query(&self) -> SurveyListQuery {
        SurveyListQuery {
            q: self.q.clone(),
            status: self.filter.clone(),
        }
    }
}

/// Delete confirmation posted from the survey list.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteSurveyForm {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

impl DeleteSurveyForm {
    pub fn list_query(&self) -> SurveyListQuery {
        SurveyListQuery {
            q: self.q.clone(),
            status: self.filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_to_all() {
        let query = SurveyListQuery {
            q: Some("  jane ".to_string()),
            status: Some("bogus".to_string()),
        };
        assert_eq!(query.search(), "jane");
        assert_eq!(query.filter(), StatusFilter::All);
    }

    #[test]
    fn status_form_parses_labels() {
        let form = StatusUpdateForm {
            status: "Quote Sent".to_string(),
            q: None,
            filter: Some("New".to_string()),
        };
        assert_eq!(form.status().unwrap(), SurveyStatus::QuoteSent);
        assert_eq!(
            form.list_query().filter(),
            StatusFilter::Only(SurveyStatus::New)
        );

        let form = StatusUpdateForm {
            status: "Completed".to_string(),
            q: None,
            filter: None,
        };
        assert!(matches!(form.status(), Err(FormError::InvalidValue(_))));
    }
}
