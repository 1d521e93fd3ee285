//! Multipart form posted by the public client survey page.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;

use crate::domain::survey::{FieldId, PhotoFile, SurveyDraft};
use crate::domain::types::BuilderId;
use crate::forms::FormError;

/// `?builder=ID` query of the shareable survey link.
#[derive(Debug, Default, Deserialize)]
pub struct BuilderQuery {
    pub builder: Option<String>,
}

impl BuilderQuery {
    pub fn builder_id(&self) -> Option<BuilderId> {
        self.builder
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|id| BuilderId::new(id).ok())
    }
}

/// What the visitor asked for when posting the survey.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurveyAction {
    /// Re-render with updated visibility and derived areas.
    #[default]
    Refresh,
    Submit,
}

#[derive(MultipartForm)]
pub struct SurveyForm {
    pub action: Option<Text<String>>,
    pub full_name: Option<Text<String>>,
    pub phone_number: Option<Text<String>>,
    pub measurement_type: Option<Text<String>>,
    pub total_size: Option<Text<String>>,
    pub length: Option<Text<String>>,
    pub width: Option<Text<String>>,
    pub height: Option<Text<String>>,
    pub property_type: Option<Text<String>>,
    pub home_age: Option<Text<String>>,
    pub tile_preference: Option<Text<String>>,
    pub include_tiles: Option<Text<String>>,
    pub toilet_move: Option<Text<String>>,
    pub wall_change: Option<Text<String>>,
    /// Key of the photos accepted by earlier posts of the same form.
    pub draft_key: Option<Text<String>>,
    /// Index of an accepted photo to drop.
    pub remove_photo: Option<Text<String>>,
    // The limit applies to all `photos` parts together.
    #[multipart(limit = "64MB")]
    pub photos: Vec<TempFile>,
}

/// Draft rebuilt from one post of the survey form.
///
/// The draft carries no photos yet: `batch` still has to be appended to the
/// selection kept under `draft_key`.
#[derive(Debug, Default)]
pub struct SurveyPost {
    pub draft: SurveyDraft,
    pub action: SurveyAction,
    /// Files attached to this post.
    pub batch: Vec<PhotoFile>,
    pub draft_key: Option<String>,
    pub remove_photo: Option<usize>,
    /// Answers that could not be read; the other fields are kept.
    pub field_errors: Vec<String>,
}

fn read_photo(file: &TempFile) -> Result<Option<PhotoFile>, FormError> {
    let file_name = file.file_name.clone().unwrap_or_default();
    // Browsers post an empty part when no file was chosen.
    if file_name.is_empty() && file.size == 0 {
        return Ok(None);
    }
    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();
    let data = std::fs::read(file.file.path()).map_err(|e| FormError::Upload(e.to_string()))?;
    Ok(Some(PhotoFile::new(file_name, content_type, data)))
}

impl SurveyForm {
    fn text_fields(&self) -> [(FieldId, Option<&str>); 13] {
        fn value(field: &Option<Text<String>>) -> Option<&str> {
            field.as_ref().map(|t| t.0.as_str())
        }
        // The measurement type goes first so later fields derive against it.
        [
            (FieldId::MeasurementType, value(&self.measurement_type)),
            (FieldId::FullName, value(&self.full_name)),
            (FieldId::PhoneNumber, value(&self.phone_number)),
            (FieldId::TotalSize, value(&self.total_size)),
            (FieldId::Length, value(&self.length)),
            (FieldId::Width, value(&self.width)),
            (FieldId::Height, value(&self.height)),
            (FieldId::PropertyType, value(&self.property_type)),
            (FieldId::HomeAge, value(&self.home_age)),
            (FieldId::TilePreference, value(&self.tile_preference)),
            (FieldId::IncludeTiles, value(&self.include_tiles)),
            (FieldId::ToiletMove, value(&self.toilet_move)),
            (FieldId::WallChange, value(&self.wall_change)),
        ]
    }

    pub fn action(&self) -> SurveyAction {
        match self.action.as_ref().map(|t| t.0.as_str()) {
            Some("submit") => SurveyAction::Submit,
            _ => SurveyAction::Refresh,
        }
    }

    /// Rebuilds the draft from the posted fields and reads the attached
    /// photos. Unreadable answers or files are reported in `field_errors`.
    pub fn into_post(self) -> SurveyPost {
        let mut draft = SurveyDraft::new();
        let mut field_errors = Vec::new();
        for (field, value) in self.text_fields() {
            if let Some(value) = value {
                if let Err(err) = draft.set(field, value) {
                    field_errors.push(err.to_string());
                }
            }
        }

        let mut batch = Vec::with_capacity(self.photos.len());
        for file in &self.photos {
            match read_photo(file) {
                Ok(Some(photo)) => batch.push(photo),
                Ok(None) => {}
                Err(err) => field_errors.push(err.to_string()),
            }
        }

        let text = |field: &Option<Text<String>>| {
            field
                .as_ref()
                .map(|t| t.0.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        SurveyPost {
            draft,
            action: self.action(),
            batch,
            draft_key: text(&self.draft_key),
            remove_photo: text(&self.remove_photo).and_then(|v| v.parse().ok()),
            field_errors,
        }
    }
}
