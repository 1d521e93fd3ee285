//! View models of the public survey page.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::survey::{
    ChoiceOption, FieldKind, FieldWidth, SURVEY_STEPS, SurveyDraft, SurveyStep,
};
use crate::domain::types::{BuilderId, format_area};

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub sublabel: Option<&'static str>,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub width: FieldWidth,
    pub placeholder: Option<&'static str>,
    pub value: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub number: u8,
    pub title: &'static str,
    pub fields: Vec<FieldView>,
}

/// Derived areas formatted for the calculated display.
#[derive(Debug, Serialize, PartialEq)]
pub struct AreasView {
    pub floor_area: String,
    pub wall_area: String,
    pub total_area: String,
}

impl AreasView {
    fn from_draft(draft: &SurveyDraft) -> Self {
        let fmt = |value: Option<f64>| format_area(value, 2).unwrap_or_else(|| "0.00".to_string());
        Self {
            floor_area: fmt(draft.derived.map(|a| a.floor_area)),
            wall_area: fmt(draft.derived.map(|a| a.wall_area)),
            total_area: fmt(draft.derived.map(|a| a.total_area)),
        }
    }
}

/// Everything the survey template needs.
#[derive(Debug, Serialize)]
pub struct SurveyPageData {
    pub builder_id: i64,
    pub steps: Vec<StepView>,
    pub areas: AreasView,
    pub photo_names: Vec<String>,
    /// Posted back so the next post finds the accepted photos.
    pub draft_key: Option<String>,
}

fn options_view(options: &'static [ChoiceOption], selected: Option<&str>) -> Vec<OptionView> {
    options
        .iter()
        .map(|option| OptionView {
            value: option.value,
            label: option.label,
            sublabel: option.sublabel,
            checked: selected == Some(option.value),
        })
        .collect()
}

fn step_view(step: &'static SurveyStep, draft: &SurveyDraft) -> StepView {
    StepView {
        number: step.number,
        title: step.title,
        fields: step
            .fields
            .iter()
            .filter(|field| field.is_visible(draft))
            .map(|field| {
                let value = draft.value_of(field.id);
                FieldView {
                    id: field.id.as_str(),
                    label: field.label,
                    kind: field.kind,
                    width: field.width,
                    placeholder: field.placeholder,
                    value: value.unwrap_or_default().to_string(),
                    options: options_view(field.options, value),
                }
            })
            .collect(),
    }
}

impl SurveyPageData {
    /// Renders the questionnaire for `draft`, hiding fields whose condition
    /// does not hold.
    pub fn new(builder_id: BuilderId, draft: &SurveyDraft) -> Self {
        Self {
            builder_id: builder_id.get(),
            steps: SURVEY_STEPS.iter().map(|step| step_view(step, draft)).collect(),
            areas: AreasView::from_draft(draft),
            photo_names: draft
                .photos
                .file_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            draft_key: None,
        }
    }

    pub fn with_draft_key(mut self, key: Uuid) -> Self {
        self.draft_key = Some(key.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::FieldId;

    fn field_ids(page: &SurveyPageData) -> Vec<&'static str> {
        page.steps
            .iter()
            .flat_map(|step| step.fields.iter().map(|f| f.id))
            .collect()
    }

    #[test]
    fn hidden_fields_are_not_rendered() {
        let builder = BuilderId::new(3).unwrap();
        let mut draft = SurveyDraft::new();

        let page = SurveyPageData::new(builder, &draft);
        assert!(field_ids(&page).contains(&"total_size"));
        assert!(!field_ids(&page).contains(&"length"));
        assert_eq!(page.areas.total_area, "0.00");

        draft.set(FieldId::MeasurementType, "calculate").unwrap();
        draft.set(FieldId::Length, "3").unwrap();
        draft.set(FieldId::Width, "2").unwrap();
        draft.set(FieldId::Height, "2.5").unwrap();
        let page = SurveyPageData::new(builder, &draft);
        assert!(!field_ids(&page).contains(&"total_size"));
        assert!(field_ids(&page).contains(&"calculated_areas"));
        assert_eq!(
            page.areas,
            AreasView {
                floor_area: "6.00".to_string(),
                wall_area: "25.00".to_string(),
                total_area: "31.00".to_string(),
            }
        );
    }

    #[test]
    fn selected_options_are_checked() {
        let mut draft = SurveyDraft::new();
        draft.set(FieldId::TilePreference, "standard").unwrap();
        let page = SurveyPageData::new(BuilderId::new(1).unwrap(), &draft);

        let tiles = page
            .steps
            .iter()
            .flat_map(|s| &s.fields)
            .find(|f| f.id == "tile_preference")
            .unwrap();
        let checked = tiles
            .options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.value)
            .collect::<Vec<_>>();
        assert_eq!(checked, vec!["standard"]);

        let include = page
            .steps
            .iter()
            .flat_map(|s| &s.fields)
            .find(|f| f.id == "include_tiles")
            .unwrap();
        assert!(include.options[0].checked);
    }
}
