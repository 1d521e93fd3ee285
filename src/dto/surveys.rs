//! View models of the survey management and detail pages.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::client_survey::{ClientSurvey, StatusFilter, SurveyStats, SurveyStatus};
use crate::domain::types::display_area;
use crate::dto::Alert;

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Status choices with the current one marked.
pub fn status_options(current: Option<SurveyStatus>) -> Vec<StatusOption> {
    SurveyStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            selected: current == Some(status),
        })
        .collect()
}

fn format_date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_date_time(value: Option<NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%B %-d, %Y %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_money(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("${v:.2}"))
}

/// One row of the survey list.
#[derive(Debug, Serialize)]
pub struct SurveyRow {
    pub id: i64,
    pub client_name: String,
    pub client_phone: String,
    pub total_area: String,
    pub tiling_level: String,
    pub status: String,
    /// `false` when the recorded status is outside the pipeline.
    pub status_listed: bool,
    pub badge: &'static str,
    pub created_at: String,
    pub status_options: Vec<StatusOption>,
}

impl From<&ClientSurvey> for SurveyRow {
    fn from(survey: &ClientSurvey) -> Self {
        Self {
            id: survey.id.get(),
            client_name: survey.client_name.clone(),
            client_phone: survey.client_phone.clone(),
            total_area: display_area(survey.total_area),
            tiling_level: survey.tiling_level.clone().unwrap_or_else(|| "-".to_string()),
            status: survey.status.label().to_string(),
            status_listed: survey.status.known().is_some(),
            badge: survey.status.badge(),
            created_at: format_date(survey.created_at),
            status_options: status_options(survey.status.known()),
        }
    }
}

/// Data required to render the survey management page.
#[derive(Debug, Serialize)]
pub struct SurveysPageData {
    pub surveys: Vec<SurveyRow>,
    pub stats: SurveyStats,
    pub search_query: String,
    pub status_filter: &'static str,
    pub filter_options: Vec<StatusOption>,
    /// Whether the builder has any survey at all, regardless of filters.
    pub has_surveys: bool,
    pub alert: Option<Alert>,
}

impl SurveysPageData {
    pub fn new(
        surveys: &[&ClientSurvey],
        stats: SurveyStats,
        search_query: &str,
        filter: StatusFilter,
    ) -> Self {
        let selected = match filter {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status),
        };
        Self {
            surveys: surveys.iter().map(|s| SurveyRow::from(*s)).collect(),
            has_surveys: stats.total > 0,
            stats,
            search_query: search_query.to_string(),
            status_filter: filter.as_str(),
            filter_options: status_options(selected),
            alert: None,
        }
    }

    #[must_use]
    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

/// Labelled value of the detail page.
#[derive(Debug, Serialize)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// Data required to render one survey in full.
#[derive(Debug, Serialize)]
pub struct SurveyDetailData {
    pub id: i64,
    pub client_name: String,
    pub client_phone: String,
    pub status: String,
    pub status_listed: bool,
    pub badge: &'static str,
    pub status_options: Vec<StatusOption>,
    pub measurements: Vec<DetailField>,
    pub property: Vec<DetailField>,
    pub estimates: Vec<DetailField>,
    pub photos: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub alert: Option<Alert>,
}

impl From<&ClientSurvey> for SurveyDetailData {
    fn from(survey: &ClientSurvey) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "Not specified".to_string());
        let mut measurements = vec![DetailField {
            label: "Total Area",
            value: survey
                .total_area
                .map(|_| display_area(survey.total_area))
                .unwrap_or_else(|| "Not specified".to_string()),
        }];
        let optional = [
            ("Floor Length", survey.floor_length, "m"),
            ("Floor Width", survey.floor_width, "m"),
            ("Wall Height", survey.wall_height, "m"),
        ];
        measurements.extend(optional.into_iter().filter_map(|(label, value, unit)| {
            value.map(|v| DetailField {
                label,
                value: format!("{v:.1} {unit}"),
            })
        }));
        let areas = [
            ("Calculated Floor Area", survey.calculated_floor_area),
            ("Calculated Wall Area", survey.calculated_wall_area),
        ];
        measurements.extend(areas.into_iter().filter_map(|(label, value)| {
            value.map(|_| DetailField {
                label,
                value: display_area(value),
            })
        }));

        let estimates = [
            ("Budget Area", survey.budget_area.map(|_| display_area(survey.budget_area))),
            ("Standard Area", survey.standard_area.map(|_| display_area(survey.standard_area))),
            ("Premium Area", survey.premium_area.map(|_| display_area(survey.premium_area))),
            ("Base Estimate", format_money(survey.base_estimate)),
            ("High Estimate", format_money(survey.high_estimate)),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| DetailField { label, value }))
        .collect();

        Self {
            id: survey.id.get(),
            client_name: survey.client_name.clone(),
            client_phone: survey.client_phone.clone(),
            status: survey.status.label().to_string(),
            status_listed: survey.status.known().is_some(),
            badge: survey.status.badge(),
            status_options: status_options(survey.status.known()),
            measurements,
            property: vec![
                DetailField {
                    label: "Bathroom Type",
                    value: text(&survey.bathroom_type),
                },
                DetailField {
                    label: "Tiling Level",
                    value: text(&survey.tiling_level),
                },
                DetailField {
                    label: "Design Style",
                    value: text(&survey.design_style),
                },
                DetailField {
                    label: "Home Age",
                    value: text(&survey.home_age_category),
                },
            ],
            estimates,
            photos: survey.photos.clone(),
            created_at: format_date_time(survey.created_at),
            updated_at: format_date_time(survey.updated_at),
            alert: None,
        }
    }
}
