//! Client surveys as returned by the backend and the lead pipeline statuses.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{SurveyId, TypeConstraintError, de_opt_number};

/// Position of a lead in the builder's pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SurveyStatus {
    #[default]
    New,
    Contacted,
    #[serde(rename = "Site Visit Done")]
    SiteVisitDone,
    #[serde(rename = "Quote Sent")]
    QuoteSent,
    #[serde(rename = "Quote Accepted")]
    QuoteAccepted,
    #[serde(rename = "Quote Unsuccessful")]
    QuoteUnsuccessful,
    #[serde(rename = "Client Not Interested")]
    ClientNotInterested,
    #[serde(rename = "Client Uncontactable")]
    ClientUncontactable,
}

impl SurveyStatus {
    pub const ALL: [SurveyStatus; 8] = [
        SurveyStatus::New,
        SurveyStatus::Contacted,
        SurveyStatus::SiteVisitDone,
        SurveyStatus::QuoteSent,
        SurveyStatus::QuoteAccepted,
        SurveyStatus::QuoteUnsuccessful,
        SurveyStatus::ClientNotInterested,
        SurveyStatus::ClientUncontactable,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SurveyStatus::New => "New",
            SurveyStatus::Contacted => "Contacted",
            SurveyStatus::SiteVisitDone => "Site Visit Done",
            SurveyStatus::QuoteSent => "Quote Sent",
            SurveyStatus::QuoteAccepted => "Quote Accepted",
            SurveyStatus::QuoteUnsuccessful => "Quote Unsuccessful",
            SurveyStatus::ClientNotInterested => "Client Not Interested",
            SurveyStatus::ClientUncontactable => "Client Uncontactable",
        }
    }

    /// Colour of the status badge.
    pub const fn badge(self) -> &'static str {
        match self {
            SurveyStatus::New => "blue",
            SurveyStatus::Contacted => "yellow",
            SurveyStatus::SiteVisitDone => "purple",
            SurveyStatus::QuoteSent => "orange",
            SurveyStatus::QuoteAccepted => "green",
            SurveyStatus::QuoteUnsuccessful => "red",
            SurveyStatus::ClientNotInterested => "gray",
            SurveyStatus::ClientUncontactable => "slate",
        }
    }
}

impl Display for SurveyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurveyStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SurveyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Status as recorded by the backend.
///
/// Records written outside the pipeline (older builds used labels such as
/// `Completed`) keep their label verbatim instead of failing the whole list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordedStatus {
    Known(SurveyStatus),
    Other(String),
}

impl RecordedStatus {
    /// The pipeline status, if the label is one of the known ones.
    pub fn known(&self) -> Option<SurveyStatus> {
        match self {
            RecordedStatus::Known(status) => Some(*status),
            RecordedStatus::Other(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RecordedStatus::Known(status) => status.as_str(),
            RecordedStatus::Other(label) => label,
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            RecordedStatus::Known(status) => status.badge(),
            RecordedStatus::Other(_) => "gray",
        }
    }
}

impl Default for RecordedStatus {
    fn default() -> Self {
        RecordedStatus::Known(SurveyStatus::default())
    }
}

impl From<SurveyStatus> for RecordedStatus {
    fn from(status: SurveyStatus) -> Self {
        RecordedStatus::Known(status)
    }
}

impl PartialEq<SurveyStatus> for RecordedStatus {
    fn eq(&self, other: &SurveyStatus) -> bool {
        self.known() == Some(*other)
    }
}

impl Display for RecordedStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RecordedStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::trim) {
            None | Some("") => RecordedStatus::default(),
            Some(label) => match label.parse::<SurveyStatus>() {
                Ok(status) => RecordedStatus::Known(status),
                Err(_) => {
                    log::warn!("Survey has status outside the pipeline: {label}");
                    RecordedStatus::Other(label.to_string())
                }
            },
        })
    }
}

/// Reads a string that the backend may send as `null`.
fn de_null_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts either a JSON array of URLs or a string holding one.
fn de_photos<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPhotos {
        List(Vec<String>),
        Encoded(String),
    }

    Ok(match Option::<RawPhotos>::deserialize(deserializer)? {
        Some(RawPhotos::List(urls)) => urls,
        Some(RawPhotos::Encoded(encoded)) => decode_photo_urls(&encoded),
        None => Vec::new(),
    })
}

/// Decodes the JSON-encoded photo list, treating malformed input as empty.
pub fn decode_photo_urls(encoded: &str) -> Vec<String> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Vec::new();
    }
    serde_json::from_str::<Vec<String>>(encoded).unwrap_or_else(|err| {
        log::warn!("Ignoring malformed survey photo list: {err}");
        Vec::new()
    })
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Parses the backend timestamp formats (RFC 3339 or `YYYY-MM-DD HH:MM:SS`).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Survey record owned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientSurvey {
    pub id: SurveyId,
    #[serde(default, deserialize_with = "de_null_string")]
    pub client_name: String,
    #[serde(default, deserialize_with = "de_null_string")]
    pub client_phone: String,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub total_area: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub floor_length: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub floor_width: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub wall_height: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub calculated_floor_area: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub calculated_wall_area: Option<f64>,
    #[serde(default)]
    pub bathroom_type: Option<String>,
    #[serde(default)]
    pub tiling_level: Option<String>,
    #[serde(default)]
    pub design_style: Option<String>,
    #[serde(default)]
    pub home_age_category: Option<String>,
    #[serde(default, deserialize_with = "de_photos")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub status: RecordedStatus,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub budget_area: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub standard_area: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub premium_area: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub base_estimate: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub high_estimate: Option<f64>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

impl ClientSurvey {
    /// Whether the survey matches a free-text search term.
    ///
    /// Names match case-insensitively, phone numbers as a plain substring.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        self.client_name
            .to_lowercase()
            .contains(&term.to_lowercase())
            || self.client_phone.contains(term)
    }

    pub fn has_area_estimates(&self) -> bool {
        self.budget_area.is_some() || self.standard_area.is_some() || self.premium_area.is_some()
    }
}

/// Status filter of the survey management page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SurveyStatus),
}

impl StatusFilter {
    pub fn matches(self, status: &RecordedStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => *status == expected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

/// Counters shown above the survey list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SurveyStats {
    pub total: usize,
    pub new: usize,
    pub contacted: usize,
    pub completed: usize,
}

impl SurveyStats {
    pub fn from_surveys(surveys: &[ClientSurvey]) -> Self {
        let count = |status: SurveyStatus| surveys.iter().filter(|s| s.status == status).count();
        Self {
            total: surveys.len(),
            new: count(SurveyStatus::New),
            contacted: count(SurveyStatus::Contacted),
            completed: count(SurveyStatus::QuoteAccepted),
        }
    }
}

/// Surveys fetched for one page render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurveyListing {
    surveys: Vec<ClientSurvey>,
}

impl SurveyListing {
    pub fn new(surveys: Vec<ClientSurvey>) -> Self {
        Self { surveys }
    }

    pub fn surveys(&self) -> &[ClientSurvey] {
        &self.surveys
    }

    pub fn stats(&self) -> SurveyStats {
        SurveyStats::from_surveys(&self.surveys)
    }

    /// Surveys matching both the search term and the status filter.
    pub fn filtered(&self, term: &str, filter: StatusFilter) -> Vec<&ClientSurvey> {
        self.surveys
            .iter()
            .filter(|s| s.matches_search(term) && filter.matches(&s.status))
            .collect()
    }

    /// Most recently created surveys first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> Vec<&ClientSurvey> {
        let mut surveys = self.surveys.iter().collect::<Vec<_>>();
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        surveys.truncate(limit);
        surveys
    }

    /// Sets the status of one survey. Returns `false` when the id is absent.
    pub fn apply_status(&mut self, id: SurveyId, status: SurveyStatus) -> bool {
        match self.surveys.iter_mut().find(|s| s.id == id) {
            Some(survey) => {
                survey.status = status.into();
                true
            }
            None => false,
        }
    }

    /// Drops one survey. Returns `false` when the id is absent.
    pub fn remove(&mut self, id: SurveyId) -> bool {
        let before = self.surveys.len();
        self.surveys.retain(|s| s.id != id);
        self.surveys.len() != before
    }

    pub fn into_inner(self) -> Vec<ClientSurvey> {
        self.surveys
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn survey(id: i64, name: &str, phone: &str, status: SurveyStatus) -> ClientSurvey {
        ClientSurvey {
            id: SurveyId::new(id).unwrap(),
            client_name: name.to_string(),
            client_phone: phone.to_string(),
            total_area: None,
            floor_length: None,
            floor_width: None,
            wall_height: None,
            calculated_floor_area: None,
            calculated_wall_area: None,
            bathroom_type: None,
            tiling_level: None,
            design_style: None,
            home_age_category: None,
            photos: Vec::new(),
            status: status.into(),
            budget_area: None,
            standard_area: None,
            premium_area: None,
            base_estimate: None,
            high_estimate: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn listing() -> SurveyListing {
        SurveyListing::new(vec![
            survey(1, "Jane Doe", "0400 111 222", SurveyStatus::New),
            survey(2, "John Smith", "0400 333 444", SurveyStatus::Contacted),
            survey(3, "Janet Brown", "0299 555 666", SurveyStatus::QuoteAccepted),
        ])
    }

    #[test]
    fn parses_backend_payload_with_string_numbers() {
        let json = r#"{
            "id": 7,
            "client_name": "Jane Doe",
            "client_phone": "0400 111 222",
            "total_area": "31.00",
            "calculated_floor_area": 6,
            "photos": "[\"https://cdn.example.com/a.jpg\",\"https://cdn.example.com/b.jpg\"]",
            "status": "Site Visit Done",
            "budget_area": null,
            "created_at": "2024-05-01T10:30:00.000000Z",
            "updated_at": "2024-05-02 08:00:00"
        }"#;

        let survey: ClientSurvey = serde_json::from_str(json).unwrap();

        assert_eq!(survey.id.get(), 7);
        assert_eq!(survey.total_area, Some(31.0));
        assert_eq!(survey.calculated_floor_area, Some(6.0));
        assert_eq!(survey.photos.len(), 2);
        assert_eq!(survey.status, SurveyStatus::SiteVisitDone);
        assert!(survey.created_at.is_some());
        assert!(survey.updated_at.is_some());
        assert!(!survey.has_area_estimates());
    }

    #[test]
    fn list_keeps_records_outside_the_pipeline() {
        let json = r#"[
            {"id": 1, "client_name": "Jane Doe", "client_phone": "0400 111 222", "status": "New"},
            {"id": 2, "client_name": "John Smith", "client_phone": null, "status": "Completed"}
        ]"#;

        let surveys: Vec<ClientSurvey> = serde_json::from_str(json).unwrap();

        assert_eq!(surveys[0].status, SurveyStatus::New);
        assert_eq!(surveys[1].status, RecordedStatus::Other("Completed".to_string()));
        assert_eq!(surveys[1].status.label(), "Completed");
        assert_eq!(surveys[1].status.badge(), "gray");
        assert_eq!(surveys[1].client_phone, "");

        let listing = SurveyListing::new(surveys);
        assert_eq!(listing.stats().total, 2);
        assert_eq!(listing.stats().new, 1);
        assert_eq!(listing.filtered("", StatusFilter::All).len(), 2);
        assert!(listing.filtered("", StatusFilter::Only(SurveyStatus::QuoteAccepted)).is_empty());
    }

    #[test]
    fn status_change_replaces_unknown_label() {
        let mut record = survey(5, "Ann", "0400", SurveyStatus::New);
        record.status = RecordedStatus::Other("Cancelled".to_string());
        let mut listing = SurveyListing::new(vec![record]);

        assert!(listing.apply_status(SurveyId::new(5).unwrap(), SurveyStatus::Contacted));
        assert_eq!(listing.surveys()[0].status, SurveyStatus::Contacted);
    }

    #[test]
    fn malformed_photo_list_is_empty() {
        assert!(decode_photo_urls("not json").is_empty());
        assert!(decode_photo_urls("").is_empty());
        assert_eq!(decode_photo_urls(r#"["x.png"]"#), vec!["x.png".to_string()]);
    }

    #[test]
    fn status_round_trips_through_labels() {
        for status in SurveyStatus::ALL {
            assert_eq!(status.as_str().parse::<SurveyStatus>().unwrap(), status);
        }
        assert!("Completed".parse::<SurveyStatus>().is_err());
    }

    #[test]
    fn search_matches_name_case_insensitively_and_phone() {
        let listing = listing();
        let names = |term: &str| {
            listing
                .filtered(term, StatusFilter::All)
                .iter()
                .map(|s| s.client_name.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(names("JAN"), vec!["Jane Doe", "Janet Brown"]);
        assert_eq!(names("333"), vec!["John Smith"]);
        assert_eq!(names(""), vec!["Jane Doe", "John Smith", "Janet Brown"]);
    }

    #[test]
    fn status_filter_narrows_results() {
        let listing = listing();
        let filter: StatusFilter = "Contacted".parse().unwrap();
        let result = listing.filtered("", filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.get(), 2);
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
    }

    #[test]
    fn stats_count_pipeline_stages() {
        assert_eq!(
            listing().stats(),
            SurveyStats {
                total: 3,
                new: 1,
                contacted: 1,
                completed: 1
            }
        );
    }

    #[test]
    fn status_and_removal_only_touch_known_ids() {
        let mut listing = listing();
        let id = SurveyId::new(1).unwrap();
        assert!(listing.apply_status(id, SurveyStatus::QuoteSent));
        assert_eq!(listing.surveys()[0].status, SurveyStatus::QuoteSent);

        let missing = SurveyId::new(99).unwrap();
        let before = listing.clone();
        assert!(!listing.apply_status(missing, SurveyStatus::New));
        assert!(!listing.remove(missing));
        assert_eq!(listing, before);

        assert!(listing.remove(id));
        assert_eq!(listing.surveys().len(), 2);
    }
}
